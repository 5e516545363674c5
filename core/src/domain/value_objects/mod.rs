//! Value objects representing immutable domain concepts.

pub mod credentials;
pub mod request_context;

// Re-export commonly used types
pub use credentials::Credentials;
pub use request_context::RequestContext;
