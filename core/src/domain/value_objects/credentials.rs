//! E-mail/password pair.

use serde::{Deserialize, Serialize};
use sv_shared::utils::validation::{mask_identifier, mask_secret};

/// An e-mail/password pair, either submitted by a caller or held as reference
///
/// `Debug` masks both fields so the pair can appear in logs and panics.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields are empty
    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &mask_identifier(&self.email))
            .field("password", &mask_secret(&self.password))
            .finish()
    }
}
