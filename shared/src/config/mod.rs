//! Configuration module
//!
//! - `environment` - Environment detection and logging configuration
//! - `security` - Token, retry, key and audit policy

pub mod environment;
pub mod security;

use serde::{Deserialize, Serialize};

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use security::{AuditConfig, KeyConfig, RetryPolicyConfig, TokenPolicyConfig};

/// Complete configuration of the verification core
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Environment the core runs in
    #[serde(default)]
    pub environment: Environment,

    /// Token lifetime policy
    #[serde(default)]
    pub tokens: TokenPolicyConfig,

    /// Retry and lockout policy
    #[serde(default)]
    pub retry: RetryPolicyConfig,

    /// Key material locations
    #[serde(default)]
    pub keys: KeyConfig,

    /// Attempt audit thresholds
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SecurityConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        Self {
            environment,
            tokens: TokenPolicyConfig::from_env(),
            retry: RetryPolicyConfig::from_env(),
            keys: KeyConfig::from_env(),
            audit: AuditConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Parse configuration from a JSON document
    ///
    /// Missing sections fall back to their defaults.
    pub fn from_json(document: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(document)
    }
}
