//! Security policy configuration: token lifetime, retry/lockout, keys and auditing

use serde::{Deserialize, Serialize};
use std::env;

/// Token lifetime policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenPolicyConfig {
    /// Lifetime of a freshly issued token in seconds
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,

    /// Remaining lifetime (seconds) below which callers should refresh a token
    #[serde(default = "default_refresh_threshold_seconds")]
    pub refresh_threshold_seconds: i64,

    /// How long (seconds) expired tokens are kept before housekeeping purges them
    #[serde(default = "default_purge_grace_seconds")]
    pub purge_grace_seconds: i64,
}

impl Default for TokenPolicyConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            refresh_threshold_seconds: default_refresh_threshold_seconds(),
            purge_grace_seconds: default_purge_grace_seconds(),
        }
    }
}

impl TokenPolicyConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_seconds: env_or("SECURITY_TOKEN_TTL_SECONDS", defaults.ttl_seconds),
            refresh_threshold_seconds: env_or(
                "SECURITY_TOKEN_REFRESH_THRESHOLD_SECONDS",
                defaults.refresh_threshold_seconds,
            ),
            purge_grace_seconds: env_or(
                "SECURITY_TOKEN_PURGE_GRACE_SECONDS",
                defaults.purge_grace_seconds,
            ),
        }
    }

    /// Set token lifetime in minutes
    pub fn with_ttl_minutes(mut self, minutes: i64) -> Self {
        self.ttl_seconds = minutes * 60;
        self
    }
}

/// Retry and lockout policy for verification flows
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryPolicyConfig {
    /// Failed verifications after which a flow is locked
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Hours after the last transition at which a status is considered stale
    #[serde(default = "default_stale_after_hours")]
    pub stale_after_hours: i64,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            stale_after_hours: default_stale_after_hours(),
        }
    }
}

impl RetryPolicyConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_or("SECURITY_MAX_RETRIES", defaults.max_retries),
            stale_after_hours: env_or("SECURITY_STALE_AFTER_HOURS", defaults.stale_after_hours),
        }
    }

    /// Set the lockout threshold
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Key material locations and signature algorithm
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeyConfig {
    /// Path to the PEM-encoded RSA private key used to sign issued tokens
    #[serde(default = "default_signing_key_path")]
    pub signing_key_path: String,

    /// Path to the PEM-encoded public key matching the signing key
    #[serde(default = "default_verification_key_path")]
    pub verification_key_path: String,

    /// Signature algorithm name (JWS naming, e.g. RS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            signing_key_path: default_signing_key_path(),
            verification_key_path: default_verification_key_path(),
            algorithm: default_algorithm(),
        }
    }
}

impl KeyConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            signing_key_path: env::var("SECURITY_SIGNING_KEY_PATH")
                .unwrap_or_else(|_| default_signing_key_path()),
            verification_key_path: env::var("SECURITY_VERIFICATION_KEY_PATH")
                .unwrap_or_else(|_| default_verification_key_path()),
            algorithm: env::var("SECURITY_SIGNATURE_ALGORITHM")
                .unwrap_or_else(|_| default_algorithm()),
        }
    }
}

/// Thresholds used when auditing the attempt log
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Time window (minutes) over which failed attempts are counted
    #[serde(default = "default_failure_window_minutes")]
    pub failure_window_minutes: i64,

    /// Failed attempts inside the window that flag a subject as under attack
    #[serde(default = "default_suspicious_threshold")]
    pub suspicious_threshold: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            failure_window_minutes: default_failure_window_minutes(),
            suspicious_threshold: default_suspicious_threshold(),
        }
    }
}

impl AuditConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            failure_window_minutes: env_or(
                "SECURITY_AUDIT_WINDOW_MINUTES",
                defaults.failure_window_minutes,
            ),
            suspicious_threshold: env_or(
                "SECURITY_AUDIT_SUSPICIOUS_THRESHOLD",
                defaults.suspicious_threshold,
            ),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn default_ttl_seconds() -> i64 {
    300 // 5 minutes
}

fn default_refresh_threshold_seconds() -> i64 {
    60
}

fn default_purge_grace_seconds() -> i64 {
    86400 // 1 day
}

fn default_max_retries() -> u32 {
    3
}

fn default_stale_after_hours() -> i64 {
    24
}

fn default_signing_key_path() -> String {
    String::from("keys/token_signing_key.pem")
}

fn default_verification_key_path() -> String {
    String::from("keys/token_verification_key.pem")
}

fn default_algorithm() -> String {
    String::from("RS256")
}

fn default_failure_window_minutes() -> i64 {
    15
}

fn default_suspicious_threshold() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_policy_defaults() {
        let config = TokenPolicyConfig::default();
        assert_eq!(config.ttl_seconds, 300);
        assert_eq!(config.refresh_threshold_seconds, 60);

        let config = config.with_ttl_minutes(10);
        assert_eq!(config.ttl_seconds, 600);
    }

    #[test]
    fn test_retry_policy_builder() {
        let config = RetryPolicyConfig::default().with_max_retries(5);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.stale_after_hours, 24);
    }

    #[test]
    fn test_env_or_ignores_unparsable_values() {
        std::env::set_var("SV_SHARED_TEST_NOT_A_NUMBER", "many");
        assert_eq!(env_or("SV_SHARED_TEST_NOT_A_NUMBER", 7u32), 7);
        std::env::set_var("SV_SHARED_TEST_NUMBER", "9");
        assert_eq!(env_or("SV_SHARED_TEST_NUMBER", 7u32), 9);
        std::env::remove_var("SV_SHARED_TEST_NOT_A_NUMBER");
        std::env::remove_var("SV_SHARED_TEST_NUMBER");
    }
}
