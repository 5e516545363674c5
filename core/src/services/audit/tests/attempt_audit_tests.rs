//! Tests for AttemptAuditService

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::{purposes, AttemptOutcome, AuthAttempt};
use crate::domain::value_objects::RequestContext;
use crate::repositories::{AttemptLog, InMemoryAttemptLog};
use crate::services::audit::{AttemptAuditConfig, AttemptAuditService};

fn context() -> RequestContext {
    RequestContext::new("198.51.100.4", "Safari 18")
}

fn service(log: Arc<InMemoryAttemptLog>) -> AttemptAuditService<InMemoryAttemptLog> {
    AttemptAuditService::new(log, AttemptAuditConfig::default())
}

#[tokio::test]
async fn test_failed_attempts_window_ignores_old_entries() {
    let log = Arc::new(InMemoryAttemptLog::new());
    let old = Utc::now() - Duration::hours(1);

    log.append(AuthAttempt::failed("u1", "invalid credentials", &context()).at(old)).await.unwrap();
    log.append(AuthAttempt::failed("u1", "invalid credentials", &context())).await.unwrap();
    log.append(AuthAttempt::succeeded("u1", &context())).await.unwrap();

    let audit = service(log);
    assert_eq!(audit.failed_attempts_in_window("u1").await.unwrap(), 1);
    assert!(!audit.is_under_attack("u1").await.unwrap());
}

#[tokio::test]
async fn test_under_attack_at_threshold() {
    let log = Arc::new(InMemoryAttemptLog::new());
    for _ in 0..5 {
        log.append(AuthAttempt::failed("u1", "signature mismatch", &context())).await.unwrap();
    }

    let audit = service(log);
    assert!(audit.is_under_attack("u1").await.unwrap());
    assert!(!audit.is_under_attack("u2").await.unwrap());
}

#[tokio::test]
async fn test_suspicious_attempts_need_reason() {
    let log = Arc::new(InMemoryAttemptLog::new());
    log.append(AuthAttempt::failed("u1", "", &context())).await.unwrap();
    log.append(AuthAttempt::failed("u1", "malformed signature", &context())).await.unwrap();
    log.append(AuthAttempt::succeeded("u1", &context())).await.unwrap();

    let suspicious = service(log).suspicious_attempts("u1").await.unwrap();
    assert_eq!(suspicious.len(), 1);
    assert_eq!(suspicious[0].failure_reason(), Some("malformed signature"));
}

#[tokio::test]
async fn test_recompute_retry_count_stops_at_last_success() {
    let log = Arc::new(InMemoryAttemptLog::new());
    let now = Utc::now();
    let login = |attempt: AuthAttempt| attempt.for_purpose(purposes::LOGIN);

    log.append(login(AuthAttempt::failed("u1", "a", &context())).at(now - Duration::minutes(9))).await.unwrap();
    log.append(login(AuthAttempt::succeeded("u1", &context())).at(now - Duration::minutes(8))).await.unwrap();
    log.append(login(AuthAttempt::failed("u1", "b", &context())).at(now - Duration::minutes(7))).await.unwrap();
    log.append(login(AuthAttempt::failed("u2", "x", &context())).at(now - Duration::minutes(6))).await.unwrap();
    log.append(login(AuthAttempt::failed("u1", "c", &context())).at(now - Duration::minutes(5))).await.unwrap();

    let audit = service(log);
    assert_eq!(audit.recompute_retry_count("u1", purposes::LOGIN, None).await.unwrap(), 2);
    assert_eq!(
        audit
            .recompute_retry_count("u1", purposes::LOGIN, Some(now - Duration::minutes(6)))
            .await
            .unwrap(),
        1
    );
    assert_eq!(audit.recompute_retry_count("u3", purposes::LOGIN, None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_recompute_retry_count_skips_other_flows_and_uncounted_failures() {
    let log = Arc::new(InMemoryAttemptLog::new());
    let entries = [
        AuthAttempt::failed("u1", "invalid credentials", &context()).for_purpose(purposes::LOGIN),
        AuthAttempt::failed("u1", "signature mismatch", &context()).for_purpose(purposes::TX_VERIFICATION),
        AuthAttempt::failed("u1", "token expired", &context())
            .with_outcome(AttemptOutcome::Expired)
            .for_purpose(purposes::LOGIN),
        AuthAttempt::failed("u1", "verification unavailable", &context())
            .with_outcome(AttemptOutcome::Unavailable)
            .for_purpose(purposes::LOGIN),
        AuthAttempt::failed("u1", "verification locked", &context())
            .with_outcome(AttemptOutcome::Refused)
            .for_purpose(purposes::LOGIN),
        AuthAttempt::failed("u1", "gateway rejected request", &context()),
    ];
    for entry in entries {
        log.append(entry).await.unwrap();
    }

    let audit = service(log);
    assert_eq!(audit.recompute_retry_count("u1", purposes::LOGIN, None).await.unwrap(), 1);
    assert_eq!(
        audit
            .recompute_retry_count("u1", purposes::TX_VERIFICATION, None)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_history_range() {
    let log = Arc::new(InMemoryAttemptLog::new());
    let now = Utc::now();
    log.append(AuthAttempt::succeeded("u1", &context()).at(now - Duration::days(2))).await.unwrap();
    log.append(AuthAttempt::succeeded("u1", &context()).at(now - Duration::hours(1))).await.unwrap();

    let history = service(log)
        .history("u1", now - Duration::days(1), now)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn test_out_of_range_window_falls_back_to_default() {
    let config = sv_shared::config::AuditConfig {
        failure_window_minutes: i64::MAX,
        ..Default::default()
    };

    let config = AttemptAuditConfig::from(&config);
    assert_eq!(config.failure_window, Duration::minutes(15));
}
