//! Origin of a verification request.

use serde::{Deserialize, Serialize};

/// Network address, device and coarse location a request came from
///
/// Copied onto issued tokens and onto every recorded `AuthAttempt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Originating network address
    pub ip_address: String,

    /// Device descriptor (user agent, model, ...)
    pub device_info: String,

    /// Coarse location (country or city)
    pub location: String,
}

impl RequestContext {
    /// Creates a context from an address and a device descriptor
    pub fn new(ip_address: impl Into<String>, device_info: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            device_info: device_info.into(),
            location: String::new(),
        }
    }

    /// Adds a coarse location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}
