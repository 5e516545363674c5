//! Audit queries over the authentication attempt log.

mod service;

pub use service::{AttemptAuditConfig, AttemptAuditService};

#[cfg(test)]
mod tests;
