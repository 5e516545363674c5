//! Configuration for the verification orchestrator

use chrono::Duration;
use sv_shared::config::{RetryPolicyConfig, SecurityConfig};

use crate::domain::entities::{DEFAULT_MAX_RETRIES, DEFAULT_STALE_AFTER_HOURS};

/// Retry and staleness policy of the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Failures after which a flow locks
    pub max_retries: u32,
    /// Time since the last transition after which a flow needs manual review
    pub stale_after: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            stale_after: Duration::hours(DEFAULT_STALE_AFTER_HOURS),
        }
    }
}

impl From<&RetryPolicyConfig> for OrchestratorConfig {
    fn from(policy: &RetryPolicyConfig) -> Self {
        Self {
            max_retries: policy.max_retries,
            stale_after: Duration::try_hours(policy.stale_after_hours)
                .unwrap_or_else(|| Duration::hours(DEFAULT_STALE_AFTER_HOURS)),
        }
    }
}

impl From<&SecurityConfig> for OrchestratorConfig {
    fn from(config: &SecurityConfig) -> Self {
        Self::from(&config.retry)
    }
}
