//! Credential shape validation and constant-time comparison.

mod verifier;

pub use verifier::CredentialVerifier;
