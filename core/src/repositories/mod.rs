pub mod attempt_log;
pub mod credential_source;
pub mod token_store;

pub use attempt_log::{AttemptLog, InMemoryAttemptLog};
pub use credential_source::{CredentialSource, InMemoryCredentialSource};
pub use token_store::{InMemoryTokenStore, TokenStore};
