//! Error types for the verifiers, key material and stores
//!
//! The `Display` text of the verifier-layer errors doubles as the reason
//! recorded on a failed `VerificationStatus` and `AuthAttempt`, so the
//! messages are short, lowercase and free of caller supplied data.

use thiserror::Error;

/// Credential check failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("empty credentials")]
    Empty,

    #[error("malformed email")]
    MalformedEmail,

    #[error("password does not meet policy")]
    WeakPassword,

    #[error("invalid credentials")]
    Mismatch,
}

/// Detached signature check failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("malformed signature")]
    MalformedSignature,

    #[error("invalid public key")]
    MalformedPublicKey,

    #[error("unsupported signature algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("signature mismatch")]
    Mismatch,

    #[error("signature verification error")]
    Crypto { message: String },
}

/// Security token failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token inactive")]
    Inactive,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token does not belong to this verification")]
    SubjectMismatch,

    #[error("unknown token")]
    NotFound,

    #[error("token already exists")]
    DuplicateToken,

    #[error("token signing failed")]
    SigningFailed,
}

/// Key material loading failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Failed to load key: {message}")]
    Load { message: String },

    #[error("Invalid key format: {message}")]
    Format { message: String },
}

impl CredentialError {
    /// Stable machine readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "CREDENTIALS_EMPTY",
            Self::MalformedEmail => "EMAIL_MALFORMED",
            Self::WeakPassword => "PASSWORD_WEAK",
            Self::Mismatch => "CREDENTIALS_MISMATCH",
        }
    }
}

impl SignatureError {
    /// Stable machine readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedSignature => "SIGNATURE_MALFORMED",
            Self::MalformedPublicKey => "PUBLIC_KEY_INVALID",
            Self::UnsupportedAlgorithm { .. } => "ALGORITHM_UNSUPPORTED",
            Self::Mismatch => "SIGNATURE_MISMATCH",
            Self::Crypto { .. } => "SIGNATURE_CRYPTO_ERROR",
        }
    }
}

impl TokenError {
    /// Stable machine readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Expired => "TOKEN_EXPIRED",
            Self::Inactive => "TOKEN_INACTIVE",
            Self::InvalidSignature => "TOKEN_SIGNATURE_INVALID",
            Self::SubjectMismatch => "TOKEN_SUBJECT_MISMATCH",
            Self::NotFound => "TOKEN_NOT_FOUND",
            Self::DuplicateToken => "TOKEN_DUPLICATE",
            Self::SigningFailed => "TOKEN_SIGNING_FAILED",
        }
    }
}
