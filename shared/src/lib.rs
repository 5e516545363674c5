//! Shared utilities and common types for the security verification core
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration types (environment, logging, security policy)
//! - Input validation helpers (e-mail, password, phone shapes)
//! - Sanitising and masking of user supplied text

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AuditConfig, Environment, KeyConfig, LogFormat, LoggingConfig, RetryPolicyConfig,
    SecurityConfig, TokenPolicyConfig,
};
pub use utils::validation;
