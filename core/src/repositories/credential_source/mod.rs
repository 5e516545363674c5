//! Reference credential lookup.

mod r#trait;
pub use r#trait::CredentialSource;

mod memory;
pub use memory::InMemoryCredentialSource;
