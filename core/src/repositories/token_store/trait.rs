//! Token store trait defining the interface for security token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::SecurityToken;
use crate::errors::DomainError;

/// Repository trait for `SecurityToken` persistence
///
/// Every mutating method must be atomic per token: two concurrent
/// increments of the same counter must never lose an update. Tokens are
/// never removed on expiry; only [`TokenStore::delete`] and
/// [`TokenStore::purge_expired`] remove them.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Insert a new token
    ///
    /// # Returns
    /// * `Err(DomainError::Token(TokenError::DuplicateToken))` if the identifier is taken
    async fn save(&self, token: SecurityToken) -> Result<SecurityToken, DomainError>;

    /// Find a token by its identifier
    async fn find(&self, token_id: &str) -> Result<Option<SecurityToken>, DomainError>;

    /// All tokens issued to a subject, oldest first
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<SecurityToken>, DomainError>;

    /// Replace a stored token
    ///
    /// # Returns
    /// * `Err(DomainError::Token(TokenError::NotFound))` if the token is unknown
    async fn update(&self, token: SecurityToken) -> Result<(), DomainError>;

    /// Whether a token with this identifier is stored
    async fn exists(&self, token_id: &str) -> Result<bool, DomainError>;

    /// Remove a token, returning whether it was present
    async fn delete(&self, token_id: &str) -> Result<bool, DomainError>;

    /// Record one failed verification against a token, returning the new count
    async fn increment_failed_attempts(&self, token_id: &str) -> Result<u32, DomainError>;

    /// Clear the failed verification counter of a token
    async fn reset_failed_attempts(&self, token_id: &str) -> Result<(), DomainError>;

    /// Deactivate a token
    ///
    /// # Returns
    /// * `Ok(true)` - the token was active and is now deactivated
    /// * `Ok(false)` - the token was already deactivated
    async fn deactivate(&self, token_id: &str) -> Result<bool, DomainError>;

    /// Deactivate all active tokens of a subject, optionally for one purpose only
    ///
    /// # Returns
    /// * Number of tokens that changed state
    async fn deactivate_all_for_user(
        &self,
        user_id: &str,
        purpose: Option<&str>,
    ) -> Result<usize, DomainError>;

    /// Number of stored tokens
    async fn count(&self) -> Result<usize, DomainError>;

    /// Remove tokens whose expiry lies before `before`
    ///
    /// # Returns
    /// * Number of tokens removed
    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Whether the token exists, is active and has not expired
    async fn is_active(&self, token_id: &str) -> Result<bool, DomainError> {
        match self.find(token_id).await? {
            Some(token) => Ok(token.is_active()),
            None => Ok(false),
        }
    }
}
