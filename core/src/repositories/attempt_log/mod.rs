//! Attempt log module.

mod r#trait;
pub use r#trait::AttemptLog;

mod memory;
pub use memory::InMemoryAttemptLog;
