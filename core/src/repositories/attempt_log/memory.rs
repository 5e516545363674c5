//! In-memory implementation of AttemptLog

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::AuthAttempt;
use crate::errors::DomainError;

use super::r#trait::AttemptLog;

/// Attempt log backed by a vector guarded by an async read/write lock
#[derive(Clone)]
pub struct InMemoryAttemptLog {
    entries: Arc<RwLock<Vec<AuthAttempt>>>,
}

impl InMemoryAttemptLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    async fn select<F>(&self, predicate: F) -> Vec<AuthAttempt>
    where
        F: Fn(&AuthAttempt) -> bool,
    {
        let entries = self.entries.read().await;
        entries.iter().filter(|a| predicate(a)).cloned().collect()
    }
}

impl Default for InMemoryAttemptLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttemptLog for InMemoryAttemptLog {
    async fn append(&self, attempt: AuthAttempt) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.push(attempt);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<AuthAttempt>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.clone())
    }

    async fn by_user(&self, user_id: &str) -> Result<Vec<AuthAttempt>, DomainError> {
        Ok(self.select(|a| a.user_id() == user_id).await)
    }

    async fn latest_for_user(&self, user_id: &str) -> Result<Option<AuthAttempt>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().rev().find(|a| a.user_id() == user_id).cloned())
    }

    async fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AuthAttempt>, DomainError> {
        Ok(self
            .select(|a| a.attempted_at() >= from && a.attempted_at() <= to)
            .await)
    }

    async fn by_user_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AuthAttempt>, DomainError> {
        Ok(self
            .select(|a| {
                a.user_id() == user_id && a.attempted_at() >= from && a.attempted_at() <= to
            })
            .await)
    }

    async fn count_failed(&self, user_id: &str) -> Result<usize, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|a| a.user_id() == user_id && !a.is_success())
            .count())
    }

    async fn count_failed_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|a| a.user_id() == user_id && !a.is_success() && a.attempted_at() >= since)
            .count())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.len())
    }
}
