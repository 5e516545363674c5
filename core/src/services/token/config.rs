//! Configuration for token issuance and verification

use chrono::Duration;
use sv_shared::config::TokenPolicyConfig;

use crate::domain::entities::DEFAULT_TOKEN_TTL_SECONDS;

const DEFAULT_REFRESH_THRESHOLD_SECONDS: i64 = 60;

/// Configuration for the token issuer
#[derive(Debug, Clone)]
pub struct TokenIssuerConfig {
    /// Lifetime of issued tokens
    pub ttl: Duration,
    /// Remaining lifetime below which a token should be refreshed
    pub refresh_threshold: Duration,
}

impl Default for TokenIssuerConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
            refresh_threshold: Duration::seconds(DEFAULT_REFRESH_THRESHOLD_SECONDS),
        }
    }
}

impl From<&TokenPolicyConfig> for TokenIssuerConfig {
    fn from(policy: &TokenPolicyConfig) -> Self {
        let defaults = Self::default();
        Self {
            ttl: Duration::try_seconds(policy.ttl_seconds).unwrap_or(defaults.ttl),
            refresh_threshold: Duration::try_seconds(policy.refresh_threshold_seconds)
                .unwrap_or(defaults.refresh_threshold),
        }
    }
}
