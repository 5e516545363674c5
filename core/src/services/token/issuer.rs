//! Token issuance and revocation

use chrono::Utc;
use std::sync::Arc;

use sv_shared::utils::validation::mask_identifier;

use crate::domain::entities::SecurityToken;
use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::TokenStore;
use crate::services::signature::SigningKey;

use super::config::TokenIssuerConfig;

/// Issues signed security tokens into a token store
pub struct TokenIssuer<T: TokenStore> {
    store: Arc<T>,
    signing_key: SigningKey,
    config: TokenIssuerConfig,
}

impl<T: TokenStore> TokenIssuer<T> {
    pub fn new(store: Arc<T>, signing_key: SigningKey, config: TokenIssuerConfig) -> Self {
        Self {
            store,
            signing_key,
            config,
        }
    }

    pub fn config(&self) -> &TokenIssuerConfig {
        &self.config
    }

    /// Issue an active token for `user_id` and `purpose`
    ///
    /// The token lives for the configured TTL, carries an RS signature over
    /// its payload and is saved before it is returned.
    pub async fn issue(
        &self,
        user_id: &str,
        purpose: &str,
        context: &RequestContext,
    ) -> DomainResult<SecurityToken> {
        if user_id.trim().is_empty() || purpose.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "user id and purpose are required".to_string(),
            });
        }

        let token = SecurityToken::issued_now(user_id, purpose, self.config.ttl, context);
        let signature = self.signing_key.sign(&token.signing_payload()).map_err(|e| {
            tracing::error!(
                user_id = %mask_identifier(user_id),
                purpose = purpose,
                error = %e,
                event = "token_signing_failed",
                "Failed to sign security token"
            );
            TokenError::SigningFailed
        })?;

        let token = self.store.save(token.with_signature(signature)).await?;

        tracing::info!(
            user_id = %mask_identifier(user_id),
            purpose = purpose,
            expires_at = %token.expires_at,
            event = "token_issued",
            "Issued security token"
        );

        Ok(token)
    }

    /// Whether less than the configured refresh threshold of the token's
    /// lifetime remains
    pub fn needs_refresh(&self, token: &SecurityToken) -> bool {
        token.time_until_expiry_at(Utc::now()) < self.config.refresh_threshold
    }

    /// Deactivate one token
    ///
    /// # Returns
    /// * `Ok(true)` - the token was active
    /// * `Ok(false)` - the token was already deactivated
    pub async fn revoke(&self, token_id: &str) -> DomainResult<bool> {
        let changed = self.store.deactivate(token_id).await?;
        if changed {
            tracing::info!(event = "token_revoked", "Security token revoked");
        }
        Ok(changed)
    }

    /// Deactivate every active token of a subject, optionally for one purpose
    pub async fn revoke_all(&self, user_id: &str, purpose: Option<&str>) -> DomainResult<usize> {
        let count = self.store.deactivate_all_for_user(user_id, purpose).await?;
        tracing::info!(
            user_id = %mask_identifier(user_id),
            purpose = purpose.unwrap_or("*"),
            count = count,
            event = "tokens_revoked",
            "Security tokens revoked"
        );
        Ok(count)
    }
}
