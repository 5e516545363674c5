//! Security token services
//!
//! - Verification of expiry and embedded issuer signatures
//! - Issuance and revocation of signed tokens
//! - Background purging of long-expired tokens

mod cleanup;
mod config;
mod issuer;
mod verifier;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::TokenIssuerConfig;
pub use issuer::TokenIssuer;
pub use verifier::TokenVerifier;
