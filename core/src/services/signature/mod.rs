//! Detached RSA signature verification and key material.

pub mod keys;
pub mod verifier;

#[cfg(test)]
mod tests;

pub use keys::{KeyPair, SigningKey, VerificationKey};
pub use verifier::SignatureVerifier;
