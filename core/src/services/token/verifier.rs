//! Security token verification: expiry and embedded signature

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::SecurityToken;
use crate::errors::TokenError;
use crate::services::signature::{SignatureVerifier, VerificationKey};

/// Checks that a token is unexpired and carries a valid issuer signature
///
/// The embedded signature covers [`SecurityToken::signing_payload`] and is
/// checked against the issuer's public key. The active flag is not
/// consulted; callers decide how to treat deactivated tokens.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    signatures: SignatureVerifier,
    issuer_key: VerificationKey,
}

impl TokenVerifier {
    /// Create a verifier for RS256 tokens signed by the holder of `issuer_key`
    pub fn new(issuer_key: VerificationKey) -> Self {
        Self::with_signature_verifier(SignatureVerifier::default(), issuer_key)
    }

    pub fn with_signature_verifier(signatures: SignatureVerifier, issuer_key: VerificationKey) -> Self {
        Self {
            signatures,
            issuer_key,
        }
    }

    /// `true` iff the token is unexpired now and its signature verifies
    pub fn verify(&self, token: &SecurityToken) -> bool {
        self.check(token, Utc::now()).is_ok()
    }

    /// Check a token at `now`, expiry first
    pub fn check(&self, token: &SecurityToken, now: DateTime<Utc>) -> Result<(), TokenError> {
        if token.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        let signature = token.signature.as_deref().ok_or(TokenError::InvalidSignature)?;
        self.signatures
            .check_signature(&token.signing_payload(), signature, &self.issuer_key)
            .map_err(|e| {
                tracing::warn!(
                    token_user = %token.user_id,
                    purpose = %token.purpose,
                    cause = %e,
                    event = "token_signature_rejected",
                    "Embedded token signature rejected"
                );
                TokenError::InvalidSignature
            })
    }

    /// Remaining lifetime, zero once expired
    pub fn time_until_expiry(&self, token: &SecurityToken) -> Duration {
        token.time_until_expiry_at(Utc::now())
    }

    /// Whether less than `threshold` of the token's lifetime remains
    pub fn needs_refresh(&self, token: &SecurityToken, threshold: Duration) -> bool {
        self.time_until_expiry(token) < threshold
    }
}
