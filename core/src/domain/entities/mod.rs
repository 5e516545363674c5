//! Domain entities representing tokens, attempts and verification flows.

pub mod auth_attempt;
pub mod security_token;
pub mod verification_status;


// Re-export commonly used types
pub use auth_attempt::{AttemptOutcome, AuthAttempt};
pub use security_token::{purposes, SecurityToken, DEFAULT_TOKEN_TTL_SECONDS};
pub use verification_status::{
    blocks_verification, counts_retries, is_terminal, requires_attention, VerificationState,
    VerificationStatus, DEFAULT_MAX_RETRIES, DEFAULT_STALE_AFTER_HOURS,
};
