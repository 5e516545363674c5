//! Domain-specific error types and error handling.

mod types;


pub use types::{CredentialError, KeyError, SignatureError, TokenError};

use thiserror::Error;

use crate::domain::entities::verification_status::VerificationState;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Illegal transition from {from} to {to}")]
    InvalidTransition {
        from: VerificationState,
        to: VerificationState,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Key(#[from] KeyError),
}

pub type DomainResult<T> = Result<T, DomainError>;
