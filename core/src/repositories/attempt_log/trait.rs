//! Attempt log trait defining the interface for the authentication audit trail.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::AuthAttempt;
use crate::errors::DomainError;

/// Append-only log of authentication attempts
///
/// Entries are never modified or removed. Reads return copies in append
/// order, so callers cannot mutate the trail.
#[async_trait]
pub trait AttemptLog: Send + Sync {
    /// Append an attempt
    ///
    /// Concurrent appends must all land; none may be lost or reordered
    /// relative to the order in which they acquired the log.
    async fn append(&self, attempt: AuthAttempt) -> Result<(), DomainError>;

    /// Every attempt in append order
    async fn all(&self) -> Result<Vec<AuthAttempt>, DomainError>;

    /// Attempts of one subject in append order
    async fn by_user(&self, user_id: &str) -> Result<Vec<AuthAttempt>, DomainError>;

    /// Most recently appended attempt of a subject
    async fn latest_for_user(&self, user_id: &str) -> Result<Option<AuthAttempt>, DomainError>;

    /// Attempts with `from <= attempted_at <= to`
    async fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AuthAttempt>, DomainError>;

    /// Attempts of one subject with `from <= attempted_at <= to`
    async fn by_user_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AuthAttempt>, DomainError>;

    /// Failed attempts of a subject
    async fn count_failed(&self, user_id: &str) -> Result<usize, DomainError>;

    /// Failed attempts of a subject at or after `since`
    async fn count_failed_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, DomainError>;

    /// Number of entries
    async fn len(&self) -> Result<usize, DomainError>;

    async fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len().await? == 0)
    }
}
