//! # Verification Core
//!
//! Issues and validates short-lived security tokens, verifies user
//! credentials and detached RSA signatures, and keeps an append-only trail
//! of authentication attempts behind a retry/lockout policy.
//!
//! The externally visible entry point is
//! [`services::verification::VerificationService`], which composes the
//! verifiers with the token store and the attempt log and answers every
//! request with a [`domain::VerificationStatus`].

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod telemetry;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
