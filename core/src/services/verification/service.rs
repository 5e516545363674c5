//! Verification orchestrator: composes the verifiers with the token store,
//! the credential source and the attempt log behind the retry/lockout
//! state machine.

use chrono::Utc;
use std::sync::Arc;

use sv_shared::utils::validation::{mask_identifier, sanitize};

use crate::domain::entities::{AttemptOutcome, AuthAttempt, SecurityToken, VerificationState, VerificationStatus};
use crate::domain::value_objects::{Credentials, RequestContext};
use crate::errors::{DomainError, DomainResult, SignatureError, TokenError};
use crate::repositories::{AttemptLog, CredentialSource, TokenStore};
use crate::services::credential::CredentialVerifier;
use crate::services::signature::{SignatureVerifier, VerificationKey};
use crate::services::token::TokenVerifier;

use super::config::OrchestratorConfig;
use super::registry::StatusRegistry;
use super::transitions::{self, Admission, Outcome};
use super::types::{CredentialAttempt, SignatureEvidence, SignatureRequest, StatusKey, VerificationRequest};

const NO_EVIDENCE: &str = "no verification evidence";
const UNAVAILABLE: &str = "verification unavailable";

/// Verification orchestrator
///
/// Every verification operation answers with a [`VerificationStatus`] and
/// appends exactly one [`AuthAttempt`]. Expected failures (bad input, bad
/// signatures, expired tokens, collaborator outages) never surface as
/// errors.
pub struct VerificationService<T, L, C>
where
    T: TokenStore,
    L: AttemptLog,
    C: CredentialSource,
{
    tokens: Arc<T>,
    attempts: Arc<L>,
    credentials: Arc<C>,
    token_verifier: TokenVerifier,
    signature_verifier: SignatureVerifier,
    credential_verifier: CredentialVerifier,
    statuses: StatusRegistry,
    config: OrchestratorConfig,
}

impl<T, L, C> VerificationService<T, L, C>
where
    T: TokenStore,
    L: AttemptLog,
    C: CredentialSource,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `tokens` - Store holding issued tokens
    /// * `attempts` - Append-only attempt log
    /// * `credentials` - Source of reference credentials
    /// * `token_verifier` - Verifier holding the token issuer's public key
    /// * `config` - Retry and staleness policy
    pub fn new(
        tokens: Arc<T>,
        attempts: Arc<L>,
        credentials: Arc<C>,
        token_verifier: TokenVerifier,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            tokens,
            attempts,
            credentials,
            token_verifier,
            signature_verifier: SignatureVerifier::default(),
            credential_verifier: CredentialVerifier::new(),
            statuses: StatusRegistry::new(),
            config,
        }
    }

    /// Use another RSA algorithm for caller supplied detached signatures
    pub fn with_signature_verifier(mut self, verifier: SignatureVerifier) -> Self {
        self.signature_verifier = verifier;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Verify a presented token for the flow named by its subject and purpose
    pub async fn verify_token(&self, token: &SecurityToken, context: &RequestContext) -> VerificationStatus {
        let request = VerificationRequest::new(&token.user_id, &token.purpose, context.clone())
            .with_token(token.clone());
        self.verify(&request).await
    }

    /// Verify a raw token identifier handed in by a caller
    ///
    /// The token is looked up in the store; unknown identifiers and tokens
    /// of another flow are rejected.
    pub async fn verify_token_id(
        &self,
        user_id: &str,
        purpose: &str,
        token_id: &str,
        context: &RequestContext,
    ) -> VerificationStatus {
        let key = StatusKey::new(user_id, purpose);

        let outcome = match self.tokens.find(token_id).await {
            Ok(Some(token)) => {
                let request = VerificationRequest::new(user_id, purpose, context.clone()).with_token(token);
                return self.verify(&request).await;
            }
            Ok(None) => Outcome::rejected(TokenError::NotFound),
            Err(e) => {
                tracing::error!(
                    user_id = %mask_identifier(user_id),
                    purpose = purpose,
                    error = %e,
                    event = "token_lookup_failed",
                    "Token store lookup failed"
                );
                Outcome::Unavailable(UNAVAILABLE.to_string())
            }
        };

        self.run(&key, context, || async move { outcome }).await
    }

    /// Verify submitted credentials against the subject's reference credentials
    pub async fn verify_credentials(&self, attempt: &CredentialAttempt) -> VerificationStatus {
        self.verify(&VerificationRequest::from(attempt)).await
    }

    /// Verify a detached signature with a caller supplied public key
    pub async fn verify_signature(&self, request: &SignatureRequest) -> VerificationStatus {
        self.verify(&VerificationRequest::from(request)).await
    }

    /// Verify every piece of evidence attached to the request
    pub async fn verify(&self, request: &VerificationRequest) -> VerificationStatus {
        let key = request.key();
        self.run(&key, &request.context, || self.evaluate(&key, request))
            .await
    }

    /// Append a failed attempt without touching any status
    ///
    /// Never fails; a log that cannot be written is reported through tracing.
    pub async fn log_failed_attempt(&self, attempt: AuthAttempt) {
        self.append(attempt).await;
    }

    async fn append(&self, attempt: AuthAttempt) {
        let user_id = mask_identifier(attempt.user_id());
        if let Err(e) = self.attempts.append(attempt).await {
            tracing::error!(
                user_id = %user_id,
                error = %e,
                event = "attempt_log_write_failed",
                "Failed to append authentication attempt"
            );
        }
    }

    /// Current status of a flow, `None` if the flow was never verified
    pub async fn status(&self, user_id: &str, purpose: &str) -> Option<VerificationStatus> {
        self.statuses.snapshot(&StatusKey::new(user_id, purpose)).await
    }

    /// Administratively revoke a flow and deactivate its tokens
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::NotFound)` - the flow is unknown
    /// * `Err(DomainError::InvalidTransition)` - the flow is not `VERIFIED`, `FAILED` or `LOCKED`
    pub async fn revoke(
        &self,
        user_id: &str,
        purpose: &str,
        reason: &str,
    ) -> DomainResult<VerificationStatus> {
        let key = StatusKey::new(user_id, purpose);
        let mut guard = self
            .statuses
            .lock_existing(&key)
            .await
            .ok_or_else(|| not_found(&key))?;
        let status = guard.as_mut().ok_or_else(|| not_found(&key))?;

        let mut revoked = status.clone();
        transitions::revoke(&mut revoked, &sanitize(reason), Utc::now())?;

        let deactivated = self.tokens.deactivate_all_for_user(user_id, Some(purpose)).await?;
        *status = revoked;

        tracing::warn!(
            user_id = %mask_identifier(user_id),
            purpose = purpose,
            tokens_deactivated = deactivated,
            event = "verification_revoked",
            "Verification flow revoked"
        );

        Ok(status.clone())
    }

    /// Manual review reset of a flow back to `PENDING`
    pub async fn reset(&self, user_id: &str, purpose: &str) -> DomainResult<VerificationStatus> {
        let key = StatusKey::new(user_id, purpose);
        let mut guard = self
            .statuses
            .lock_existing(&key)
            .await
            .ok_or_else(|| not_found(&key))?;
        let status = guard.as_mut().ok_or_else(|| not_found(&key))?;

        let previous = status.state;
        transitions::reset(status, Utc::now());

        tracing::info!(
            user_id = %mask_identifier(user_id),
            purpose = purpose,
            previous_state = %previous,
            event = "verification_reset",
            "Verification flow reset"
        );

        Ok(status.clone())
    }

    #[cfg(test)]
    pub(crate) async fn hold_flow(
        &self,
        key: &StatusKey,
    ) -> tokio::sync::OwnedMutexGuard<Option<VerificationStatus>> {
        self.statuses.lock(key).await
    }

    #[cfg(test)]
    pub(crate) async fn seed_status(&self, status: VerificationStatus) {
        let key = StatusKey::new(status.user_id.clone(), status.purpose.clone());
        *self.statuses.lock(&key).await = Some(status);
    }

    /// One serialised pass of the state machine for a flow
    async fn run<F, Fut>(&self, key: &StatusKey, context: &RequestContext, evaluate: F) -> VerificationStatus
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Outcome>,
    {
        let mut guard = self.statuses.lock(key).await;
        let now = Utc::now();
        let status = guard.get_or_insert_with(|| VerificationStatus::pending(&key.user_id, &key.purpose, now));

        match transitions::admit(status, now, &self.config) {
            Admission::Evaluate => {}
            Admission::Blocked(reason) => {
                tracing::warn!(
                    user_id = %mask_identifier(&key.user_id),
                    purpose = %key.purpose,
                    state = %status.state,
                    event = "verification_blocked",
                    "Verification refused"
                );
                self.record(key, context, AttemptOutcome::Refused, Some(reason)).await;
                return status.clone();
            }
            Admission::Stale | Admission::Exhausted => {
                tracing::warn!(
                    user_id = %mask_identifier(&key.user_id),
                    purpose = %key.purpose,
                    state = %status.state,
                    reason = %status.reason,
                    event = "verification_needs_attention",
                    "Verification flow needs manual attention"
                );
                self.record(key, context, AttemptOutcome::Refused, Some(status.reason.clone()))
                    .await;
                return status.clone();
            }
        }

        let outcome = evaluate().await;
        transitions::conclude(status, &outcome, now, &self.config);
        self.record(key, context, outcome.attempt_outcome(), outcome.failure_reason())
            .await;

        match &outcome {
            Outcome::Verified => tracing::info!(
                user_id = %mask_identifier(&key.user_id),
                purpose = %key.purpose,
                event = "verification_succeeded",
                "Verification succeeded"
            ),
            _ if status.state == VerificationState::Locked => tracing::error!(
                user_id = %mask_identifier(&key.user_id),
                purpose = %key.purpose,
                retry_count = status.retry_count,
                reason = %status.reason,
                event = "verification_locked",
                "Verification flow locked after repeated failures"
            ),
            _ => tracing::warn!(
                user_id = %mask_identifier(&key.user_id),
                purpose = %key.purpose,
                state = %status.state,
                retry_count = status.retry_count,
                reason = %status.reason,
                event = "verification_failed",
                "Verification failed"
            ),
        }

        status.clone()
    }

    async fn record(
        &self,
        key: &StatusKey,
        context: &RequestContext,
        outcome: AttemptOutcome,
        failure: Option<String>,
    ) {
        let attempt = match failure {
            None => AuthAttempt::succeeded(&key.user_id, context),
            Some(reason) => AuthAttempt::failed(&key.user_id, reason, context).with_outcome(outcome),
        };
        self.append(attempt.for_purpose(&key.purpose)).await;
    }

    async fn evaluate(&self, key: &StatusKey, request: &VerificationRequest) -> Outcome {
        if request.is_empty() {
            return Outcome::rejected(NO_EVIDENCE);
        }

        if let Some(token) = &request.token {
            let outcome = self.evaluate_token(key, token).await;
            if outcome != Outcome::Verified {
                return outcome;
            }
        }

        if let Some(credentials) = &request.credentials {
            let outcome = self.evaluate_credentials(key, credentials).await;
            if outcome != Outcome::Verified {
                return outcome;
            }
        }

        if let Some(evidence) = &request.signature {
            let outcome = self.evaluate_signature(evidence);
            if outcome != Outcome::Verified {
                return outcome;
            }
        }

        if let Some(token) = &request.token {
            self.reset_token_failures(&token.token).await;
        }

        Outcome::Verified
    }

    async fn evaluate_token(&self, key: &StatusKey, token: &SecurityToken) -> Outcome {
        let now = Utc::now();

        if token.is_expired_at(now) {
            return Outcome::Expired;
        }
        if token.user_id != key.user_id || token.purpose != key.purpose {
            return Outcome::rejected(TokenError::SubjectMismatch);
        }

        let stored = match self.tokens.find(&token.token).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(error = %e, event = "token_lookup_failed", "Token store lookup failed");
                return Outcome::Unavailable(UNAVAILABLE.to_string());
            }
        };
        let deactivated = token.is_deactivated() || stored.as_ref().is_some_and(SecurityToken::is_deactivated);
        if deactivated {
            return Outcome::rejected(TokenError::Inactive);
        }

        match self.token_verifier.check(token, now) {
            Ok(()) => Outcome::Verified,
            Err(TokenError::Expired) => Outcome::Expired,
            Err(e) => {
                if stored.is_some() {
                    self.count_token_failure(&token.token).await;
                }
                Outcome::rejected(e)
            }
        }
    }

    async fn evaluate_credentials(&self, key: &StatusKey, submitted: &Credentials) -> Outcome {
        let reference = match self.credentials.reference_for(&key.user_id).await {
            Ok(reference) => reference,
            Err(e) => {
                tracing::error!(error = %e, event = "credential_lookup_failed", "Credential source lookup failed");
                return Outcome::Unavailable(UNAVAILABLE.to_string());
            }
        };

        // Unknown subjects are compared against an empty pair so they fail like a mismatch
        let reference = reference.unwrap_or_else(|| Credentials::new("", ""));

        match self.credential_verifier.check(submitted, &reference) {
            Ok(()) => Outcome::Verified,
            Err(e) => {
                tracing::debug!(
                    user_id = %mask_identifier(&key.user_id),
                    code = e.code(),
                    "Credential check failed"
                );
                Outcome::rejected(e)
            }
        }
    }

    fn evaluate_signature(&self, evidence: &SignatureEvidence) -> Outcome {
        if !SignatureVerifier::is_valid_base64(&evidence.signature_b64) {
            return Outcome::rejected(SignatureError::MalformedSignature);
        }

        let key = match VerificationKey::from_pem(&evidence.public_key_pem) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(error = %e, event = "public_key_rejected", "Caller supplied public key rejected");
                return Outcome::rejected(SignatureError::MalformedPublicKey);
            }
        };

        match self
            .signature_verifier
            .check_signature(&evidence.data, &evidence.signature_b64, &key)
        {
            Ok(()) => Outcome::Verified,
            Err(e) => Outcome::rejected(e),
        }
    }

    async fn count_token_failure(&self, token_id: &str) {
        match self.tokens.increment_failed_attempts(token_id).await {
            Ok(count) => tracing::debug!(failed_attempts = count, "Token failure recorded"),
            Err(e) => tracing::error!(error = %e, event = "token_update_failed", "Failed to record token failure"),
        }
    }

    async fn reset_token_failures(&self, token_id: &str) {
        match self.tokens.reset_failed_attempts(token_id).await {
            Ok(()) | Err(DomainError::Token(TokenError::NotFound)) => {}
            Err(e) => tracing::error!(error = %e, event = "token_update_failed", "Failed to reset token failures"),
        }
    }
}

fn not_found(key: &StatusKey) -> DomainError {
    DomainError::NotFound {
        resource: format!("verification status {}", key),
    }
}
