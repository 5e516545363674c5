//! Periodic housekeeping of expired security tokens
//!
//! Expired tokens stay in the store so that late verification attempts are
//! still answered with "token expired". Once the grace period has passed
//! they are purged. Housekeeping never takes part in a verification
//! decision.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use sv_shared::config::TokenPolicyConfig;

use crate::errors::DomainError;
use crate::repositories::TokenStore;

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// How long expired tokens are kept before deletion
    pub grace_period: Duration,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            grace_period: Duration::days(1),
            enabled: true,
        }
    }
}

impl From<&TokenPolicyConfig> for TokenCleanupConfig {
    fn from(policy: &TokenPolicyConfig) -> Self {
        let defaults = Self::default();
        Self {
            grace_period: Duration::try_seconds(policy.purge_grace_seconds).unwrap_or(defaults.grace_period),
            ..defaults
        }
    }
}

/// Service purging long-expired tokens from a token store
pub struct TokenCleanupService<T: TokenStore + 'static> {
    store: Arc<T>,
    config: TokenCleanupConfig,
}

impl<T: TokenStore + 'static> TokenCleanupService<T> {
    pub fn new(store: Arc<T>, config: TokenCleanupConfig) -> Self {
        Self { store, config }
    }

    /// Run a single cleanup cycle
    pub async fn run_once(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let cutoff = Utc::now() - self.config.grace_period;
        let purged = self.store.purge_expired(cutoff).await?;

        info!(
            purged = purged,
            cutoff = %cutoff,
            event = "token_cleanup",
            "Token cleanup completed"
        );

        Ok(CleanupResult {
            expired_tokens_purged: purged,
        })
    }

    /// Run cleanup on a fixed interval in a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn spawn(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let period = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Token cleanup service started"
            );

            let mut timer = tokio::time::interval(period);
            loop {
                timer.tick().await;

                if let Err(e) = self.run_once().await {
                    error!(error = %e, "Token cleanup cycle failed");
                }
            }
        }))
    }
}

/// Result of a cleanup cycle
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired tokens removed from the store
    pub expired_tokens_purged: usize,
}
