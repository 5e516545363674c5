//! In-memory implementation of TokenStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::SecurityToken;
use crate::errors::{DomainError, TokenError};

use super::r#trait::TokenStore;

/// Token store backed by a map guarded by an async read/write lock
///
/// Each mutation happens inside a single write-lock critical section.
/// Cloning the store shares the underlying map.
#[derive(Clone)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, SecurityToken>>>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save(&self, token: SecurityToken) -> Result<SecurityToken, DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token) {
            return Err(TokenError::DuplicateToken.into());
        }

        tokens.insert(token.token.clone(), token.clone());
        Ok(token)
    }

    async fn find(&self, token_id: &str) -> Result<Option<SecurityToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<SecurityToken>, DomainError> {
        let tokens = self.tokens.read().await;
        let mut found: Vec<SecurityToken> = tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|t| t.issued_at);
        Ok(found)
    }

    async fn update(&self, token: SecurityToken) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(&token.token) {
            Some(stored) => {
                *stored = token;
                Ok(())
            }
            None => Err(TokenError::NotFound.into()),
        }
    }

    async fn exists(&self, token_id: &str) -> Result<bool, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.contains_key(token_id))
    }

    async fn delete(&self, token_id: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(token_id).is_some())
    }

    async fn increment_failed_attempts(&self, token_id: &str) -> Result<u32, DomainError> {
        let mut tokens = self.tokens.write().await;

        tokens
            .get_mut(token_id)
            .map(SecurityToken::increment_failed_attempts)
            .ok_or_else(|| TokenError::NotFound.into())
    }

    async fn reset_failed_attempts(&self, token_id: &str) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;

        let token = tokens.get_mut(token_id).ok_or(TokenError::NotFound)?;
        token.reset_failed_attempts();
        Ok(())
    }

    async fn deactivate(&self, token_id: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;

        let token = tokens.get_mut(token_id).ok_or(TokenError::NotFound)?;
        if token.is_deactivated() {
            return Ok(false);
        }
        token.deactivate();
        Ok(true)
    }

    async fn deactivate_all_for_user(
        &self,
        user_id: &str,
        purpose: Option<&str>,
    ) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;

        for token in tokens.values_mut() {
            let purpose_matches = purpose.map_or(true, |p| token.purpose == p);
            if token.user_id == user_id && purpose_matches && !token.is_deactivated() {
                token.deactivate();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.len())
    }

    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, token| token.expires_at >= before);

        Ok(initial_count - tokens.len())
    }
}
