use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::value_objects::Credentials;
use crate::errors::DomainError;

use super::r#trait::CredentialSource;

/// Credential source backed by an in-memory map, for embedding and tests
#[derive(Clone, Default)]
pub struct InMemoryCredentialSource {
    entries: Arc<RwLock<HashMap<String, Credentials>>>,
}

impl InMemoryCredentialSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the reference credentials of a subject
    pub async fn insert(&self, user_id: impl Into<String>, credentials: Credentials) {
        let mut entries = self.entries.write().await;
        entries.insert(user_id.into(), credentials);
    }

    /// Forget a subject
    pub async fn remove(&self, user_id: &str) -> bool {
        let mut entries = self.entries.write().await;
        entries.remove(user_id).is_some()
    }
}

#[async_trait]
impl CredentialSource for InMemoryCredentialSource {
    async fn reference_for(&self, user_id: &str) -> Result<Option<Credentials>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.get(user_id).cloned())
    }
}
