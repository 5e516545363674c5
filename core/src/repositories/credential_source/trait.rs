use async_trait::async_trait;

use crate::domain::value_objects::Credentials;
use crate::errors::DomainError;

/// Source of the reference credentials a submitted pair is compared against
///
/// How reference credentials are stored (hashing, directory service) is the
/// implementor's concern.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Reference credentials of a subject, `None` for unknown subjects
    async fn reference_for(&self, user_id: &str) -> Result<Option<Credentials>, DomainError>;
}
