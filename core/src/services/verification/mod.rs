//! Verification orchestrator
//!
//! This module owns the state machine of verification flows:
//! - Admission of requests (blocked, stale and exhausted flows)
//! - Evaluation of token, credential and signature evidence
//! - Retry counting and lockout
//! - Administrative revocation and reset
//! - Recording of one authentication attempt per request

mod config;
mod registry;
mod service;
mod transitions;
mod types;

#[cfg(test)]
mod tests;

pub use config::OrchestratorConfig;
pub use service::VerificationService;
pub use types::{
    CredentialAttempt, SignatureEvidence, SignatureRequest, StatusKey, VerificationRequest,
};
