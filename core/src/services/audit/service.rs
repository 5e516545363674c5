//! Audit service answering questions about recorded authentication attempts.
//!
//! Read-only: the service never appends to the log and never changes a
//! verification status.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use sv_shared::config::AuditConfig;
use sv_shared::utils::validation::mask_identifier;

use crate::domain::entities::AuthAttempt;
use crate::errors::DomainResult;
use crate::repositories::AttemptLog;

const DEFAULT_FAILURE_WINDOW_MINUTES: i64 = 15;

/// Configuration for the audit service
#[derive(Debug, Clone)]
pub struct AttemptAuditConfig {
    /// Time window for counting failed attempts
    pub failure_window: Duration,
    /// Failed attempts inside the window that flag a subject as under attack
    pub suspicious_threshold: usize,
}

impl Default for AttemptAuditConfig {
    fn default() -> Self {
        Self {
            failure_window: Duration::minutes(DEFAULT_FAILURE_WINDOW_MINUTES),
            suspicious_threshold: 5,
        }
    }
}

impl From<&AuditConfig> for AttemptAuditConfig {
    fn from(config: &AuditConfig) -> Self {
        Self {
            failure_window: Duration::try_minutes(config.failure_window_minutes)
                .unwrap_or_else(|| Duration::minutes(DEFAULT_FAILURE_WINDOW_MINUTES)),
            suspicious_threshold: config.suspicious_threshold,
        }
    }
}

/// Service for monitoring the attempt log
pub struct AttemptAuditService<L>
where
    L: AttemptLog,
{
    log: Arc<L>,
    config: AttemptAuditConfig,
}

impl<L> AttemptAuditService<L>
where
    L: AttemptLog,
{
    pub fn new(log: Arc<L>, config: AttemptAuditConfig) -> Self {
        Self { log, config }
    }

    /// Failed attempts of a subject inside the configured window
    pub async fn failed_attempts_in_window(&self, user_id: &str) -> DomainResult<usize> {
        let since = Utc::now() - self.config.failure_window;
        self.log.count_failed_since(user_id, since).await
    }

    /// Whether a subject reached the suspicious threshold inside the window
    pub async fn is_under_attack(&self, user_id: &str) -> DomainResult<bool> {
        let failures = self.failed_attempts_in_window(user_id).await?;
        let under_attack = failures >= self.config.suspicious_threshold;

        if under_attack {
            tracing::warn!(
                user_id = %mask_identifier(user_id),
                failures = failures,
                window_minutes = self.config.failure_window.num_minutes(),
                event = "suspicious_activity",
                "Failed attempt threshold reached"
            );
        }

        Ok(under_attack)
    }

    /// Failed attempts of a subject that carry a reason
    pub async fn suspicious_attempts(&self, user_id: &str) -> DomainResult<Vec<AuthAttempt>> {
        let attempts = self.log.by_user(user_id).await?;
        Ok(attempts.into_iter().filter(AuthAttempt::is_suspicious).collect())
    }

    /// Retry counter of one flow rebuilt from the log
    ///
    /// Counts rejected attempts of `(user_id, purpose)` since the flow's last
    /// success. Expired tokens, outages and refusals of a blocked flow are
    /// skipped as they leave the counter untouched. Resets are not logged,
    /// so pass the reset time as `since` for a flow that was reset.
    pub async fn recompute_retry_count(
        &self,
        user_id: &str,
        purpose: &str,
        since: Option<DateTime<Utc>>,
    ) -> DomainResult<u32> {
        let attempts = self.log.by_user(user_id).await?;

        let failures = attempts
            .iter()
            .rev()
            .filter(|a| a.purpose() == Some(purpose))
            .take_while(|a| since.map_or(true, |s| a.attempted_at() >= s))
            .take_while(|a| !a.is_success())
            .filter(|a| a.counts_toward_retry())
            .count();

        Ok(u32::try_from(failures).unwrap_or(u32::MAX))
    }

    /// Attempts of a subject inside `[from, to]`
    pub async fn history(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<AuthAttempt>> {
        self.log.by_user_between(user_id, from, to).await
    }
}
