//! Business services containing domain logic and use cases.

pub mod audit;
pub mod credential;
pub mod signature;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use audit::{AttemptAuditConfig, AttemptAuditService};
pub use credential::CredentialVerifier;
pub use signature::{KeyPair, SignatureVerifier, SigningKey, VerificationKey};
pub use token::{
    CleanupResult, TokenCleanupConfig, TokenCleanupService, TokenIssuer, TokenIssuerConfig,
    TokenVerifier,
};
pub use verification::{
    CredentialAttempt, OrchestratorConfig, SignatureEvidence, SignatureRequest, StatusKey,
    VerificationRequest, VerificationService,
};
