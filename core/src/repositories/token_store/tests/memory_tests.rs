//! Tests for InMemoryTokenStore

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::{purposes, SecurityToken};
use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainError, TokenError};
use crate::repositories::token_store::{InMemoryTokenStore, TokenStore};

fn token_for(user_id: &str, purpose: &str) -> SecurityToken {
    SecurityToken::issued_now(
        user_id,
        purpose,
        Duration::minutes(5),
        &RequestContext::new("10.0.0.1", "test-device"),
    )
}

#[tokio::test]
async fn test_save_and_find() {
    let store = InMemoryTokenStore::new();
    let token = token_for("u1", purposes::LOGIN);

    store.save(token.clone()).await.unwrap();

    let found = store.find(&token.token).await.unwrap();
    assert_eq!(found, Some(token.clone()));
    assert!(store.exists(&token.token).await.unwrap());
    assert!(store.is_active(&token.token).await.unwrap());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_save_rejected() {
    let store = InMemoryTokenStore::new();
    let token = token_for("u1", purposes::LOGIN);

    store.save(token.clone()).await.unwrap();
    let result = store.save(token).await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::DuplicateToken))
    ));
}

#[tokio::test]
async fn test_unknown_token_operations() {
    let store = InMemoryTokenStore::new();

    assert_eq!(store.find("missing").await.unwrap(), None);
    assert!(!store.is_active("missing").await.unwrap());
    assert!(!store.delete("missing").await.unwrap());
    assert!(matches!(
        store.increment_failed_attempts("missing").await,
        Err(DomainError::Token(TokenError::NotFound))
    ));
    assert!(matches!(
        store.update(token_for("u1", purposes::LOGIN)).await,
        Err(DomainError::Token(TokenError::NotFound))
    ));
}

#[tokio::test]
async fn test_failed_attempt_counter() {
    let store = InMemoryTokenStore::new();
    let token = store.save(token_for("u1", purposes::LOGIN)).await.unwrap();

    assert_eq!(store.increment_failed_attempts(&token.token).await.unwrap(), 1);
    assert_eq!(store.increment_failed_attempts(&token.token).await.unwrap(), 2);

    store.reset_failed_attempts(&token.token).await.unwrap();
    let stored = store.find(&token.token).await.unwrap().unwrap();
    assert_eq!(stored.failed_attempts(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    let store = Arc::new(InMemoryTokenStore::new());
    let token = store.save(token_for("u1", purposes::LOGIN)).await.unwrap();

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let store = Arc::clone(&store);
            let id = token.token.clone();
            tokio::spawn(async move { store.increment_failed_attempts(&id).await.unwrap() })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let stored = store.find(&token.token).await.unwrap().unwrap();
    assert_eq!(stored.failed_attempts(), 50);
}

#[tokio::test]
async fn test_deactivate_is_idempotent() {
    let store = InMemoryTokenStore::new();
    let token = store.save(token_for("u1", purposes::LOGIN)).await.unwrap();

    assert!(store.deactivate(&token.token).await.unwrap());
    assert!(!store.deactivate(&token.token).await.unwrap());
    assert!(!store.is_active(&token.token).await.unwrap());
    // Deactivated tokens stay stored
    assert!(store.exists(&token.token).await.unwrap());
}

#[tokio::test]
async fn test_deactivate_all_for_user_by_purpose() {
    let store = InMemoryTokenStore::new();
    store.save(token_for("u1", purposes::LOGIN)).await.unwrap();
    store.save(token_for("u1", purposes::LOGIN)).await.unwrap();
    store.save(token_for("u1", purposes::TX_VERIFICATION)).await.unwrap();
    store.save(token_for("u2", purposes::LOGIN)).await.unwrap();

    let changed = store
        .deactivate_all_for_user("u1", Some(purposes::LOGIN))
        .await
        .unwrap();
    assert_eq!(changed, 2);

    let changed = store.deactivate_all_for_user("u1", None).await.unwrap();
    assert_eq!(changed, 1);

    let remaining: Vec<_> = store.find_by_user("u2").await.unwrap();
    assert!(remaining.iter().all(|t| !t.is_deactivated()));
}

#[tokio::test]
async fn test_purge_expired_keeps_live_tokens() {
    let store = InMemoryTokenStore::new();
    let now = Utc::now();
    let ctx = RequestContext::default();

    let old = SecurityToken::new("u1", purposes::LOGIN, now - Duration::days(3), now - Duration::days(2), &ctx);
    let recent = SecurityToken::new("u1", purposes::LOGIN, now - Duration::minutes(10), now - Duration::minutes(5), &ctx);
    let live = token_for("u1", purposes::LOGIN);

    store.save(old.clone()).await.unwrap();
    store.save(recent.clone()).await.unwrap();
    store.save(live.clone()).await.unwrap();

    let purged = store.purge_expired(now - Duration::days(1)).await.unwrap();

    assert_eq!(purged, 1);
    assert!(!store.exists(&old.token).await.unwrap());
    assert!(store.exists(&recent.token).await.unwrap());
    assert!(store.exists(&live.token).await.unwrap());
}
