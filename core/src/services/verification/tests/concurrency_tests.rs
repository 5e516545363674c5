//! Concurrent access to one verification flow

use std::sync::Arc;

use super::*;
use crate::domain::entities::VerificationState;
use crate::repositories::AttemptLog;
use crate::services::verification::{CredentialAttempt, StatusKey};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_lock_exactly_once() {
    let harness = Harness::new().await;
    let attempt = Arc::new(CredentialAttempt::new(
        "u1",
        purposes::LOGIN,
        Credentials::new("u1@example.com", "Wrong1234"),
        context(),
    ));

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let service = Arc::clone(&harness.service);
            let attempt = Arc::clone(&attempt);
            tokio::spawn(async move { service.verify_credentials(&attempt).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let status = harness.service.status("u1", purposes::LOGIN).await.unwrap();
    assert_eq!(status.state, VerificationState::Locked);
    assert_eq!(status.retry_count, 3);

    let attempts = harness.attempts.by_user("u1").await.unwrap();
    assert_eq!(attempts.len(), 12);
    let locked_refusals = attempts
        .iter()
        .filter(|a| a.failure_reason() == Some("verification locked"))
        .count();
    assert_eq!(locked_refusals, 9);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_token_failures_are_all_counted() {
    let harness = Harness::new().await;
    let mut tampered = harness.issue("u1").await;
    tampered.issued_at = tampered.issued_at - chrono::Duration::seconds(5);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let service = Arc::clone(&harness.service);
            let token = tampered.clone();
            tokio::spawn(async move { service.verify_token(&token, &context()).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let stored = harness.tokens.find(&tampered.token).await.unwrap().unwrap();
    assert_eq!(stored.failed_attempts(), 2);

    let status = harness
        .service
        .status("u1", purposes::SUBSCRIPTION_CHANGE)
        .await
        .unwrap();
    assert_eq!(status.state, VerificationState::Failed);
    assert_eq!(status.retry_count, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_subjects_do_not_interfere() {
    let harness = Harness::new().await;

    let handles: Vec<_> = ["u1", "u2", "u3"]
        .into_iter()
        .map(|user| {
            let service = Arc::clone(&harness.service);
            tokio::spawn(async move {
                let attempt = CredentialAttempt::new(user, purposes::LOGIN, good_credentials(user), context());
                service.verify_credentials(&attempt).await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().state, VerificationState::Verified);
    }
    assert_eq!(harness.attempts.len().await.unwrap(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_waiting_request_stamps_time_after_acquiring_the_flow() {
    let harness = Harness::new().await;
    let key = StatusKey::new("u1", purposes::LOGIN);
    let guard = harness.service.hold_flow(&key).await;

    let service = Arc::clone(&harness.service);
    let waiting = tokio::spawn(async move {
        let attempt = CredentialAttempt::new("u1", purposes::LOGIN, good_credentials("u1"), context());
        service.verify_credentials(&attempt).await
    });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let released_at = chrono::Utc::now();
    drop(guard);

    let status = waiting.await.unwrap();
    assert_eq!(status.state, VerificationState::Verified);
    assert!(status.timestamp >= released_at);
}
