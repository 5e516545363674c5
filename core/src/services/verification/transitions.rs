//! Transition table of a verification flow
//!
//! Pure functions over `VerificationStatus`. The service decides which
//! evidence to evaluate; everything that changes state, reason, timestamp
//! or counters happens here.

use chrono::{DateTime, Utc};

use crate::domain::entities::{
    blocks_verification, is_terminal, AttemptOutcome, VerificationState, VerificationStatus,
};
use crate::errors::{DomainError, DomainResult, TokenError};

use super::config::OrchestratorConfig;

pub const STALE_REASON: &str = "verification stale";
pub const LOCKOUT_PREFIX: &str = "too many failed attempts";
pub const REVOKED_BY_ADMIN: &str = "revoked by administrator";
pub const RESET_BY_ADMIN: &str = "reset by administrator";

/// Result of evaluating the evidence of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// All evidence passed
    Verified,
    /// The presented token has expired
    Expired,
    /// Evidence was rejected; counts towards lockout
    Rejected(String),
    /// A collaborator failed; the request could not be judged
    Unavailable(String),
}

impl Outcome {
    pub fn rejected(reason: impl ToString) -> Self {
        Self::Rejected(reason.to_string())
    }

    /// Kind recorded on the attempt log entry
    pub fn attempt_outcome(&self) -> AttemptOutcome {
        match self {
            Self::Verified => AttemptOutcome::Succeeded,
            Self::Expired => AttemptOutcome::Expired,
            Self::Rejected(_) => AttemptOutcome::Rejected,
            Self::Unavailable(_) => AttemptOutcome::Unavailable,
        }
    }

    /// Reason recorded on the attempt log entry, `None` on success
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Verified => None,
            Self::Expired => Some(TokenError::Expired.to_string()),
            Self::Rejected(reason) | Self::Unavailable(reason) => Some(reason.clone()),
        }
    }
}

/// What to do with a flow before evaluating new evidence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Evaluate the evidence
    Evaluate,
    /// Refuse without evaluation; state unchanged
    Blocked(String),
    /// Refuse and send the flow to manual review
    Stale,
    /// Retry budget already spent; lock without evaluation
    Exhausted,
}

/// Description recorded when a blocked flow refuses a request
pub fn blocked_reason(state: VerificationState) -> String {
    match state {
        VerificationState::Locked => "verification locked".to_string(),
        VerificationState::Revoked => "verification revoked".to_string(),
        VerificationState::AwaitingReview => "verification awaiting review".to_string(),
        other => format!("verification {}", other.as_str().to_lowercase()),
    }
}

/// Decide whether a request may be evaluated, applying pre-evaluation moves
///
/// `Failed` with retries left and `Verified`/`Expired` move back to
/// `Pending`; a stale flow moves to `AwaitingReview`.
pub fn admit(
    status: &mut VerificationStatus,
    now: DateTime<Utc>,
    config: &OrchestratorConfig,
) -> Admission {
    if blocks_verification(status.state) {
        return Admission::Blocked(blocked_reason(status.state));
    }

    if !is_terminal(status.state) && status.is_stale_at(now, config.stale_after) {
        move_to(status, VerificationState::AwaitingReview, STALE_REASON, now);
        return Admission::Stale;
    }

    match status.state {
        VerificationState::Failed if !status.can_retry_with(config.max_retries) => {
            lock(status, "retry limit reached", now);
            Admission::Exhausted
        }
        VerificationState::Failed | VerificationState::Verified | VerificationState::Expired => {
            status.state = VerificationState::Pending;
            Admission::Evaluate
        }
        _ => Admission::Evaluate,
    }
}

/// Apply the outcome of an evaluation to a `Pending` flow
pub fn conclude(
    status: &mut VerificationStatus,
    outcome: &Outcome,
    now: DateTime<Utc>,
    config: &OrchestratorConfig,
) {
    match outcome {
        Outcome::Verified => {
            move_to(status, VerificationState::Verified, "", now);
            status.retry_count = 0;
        }
        Outcome::Expired => {
            move_to(status, VerificationState::Expired, &TokenError::Expired.to_string(), now);
        }
        Outcome::Rejected(reason) => {
            status.retry_count = status.retry_count.saturating_add(1);
            if status.retry_count >= config.max_retries {
                lock(status, reason, now);
            } else {
                move_to(status, VerificationState::Failed, reason, now);
            }
        }
        Outcome::Unavailable(reason) => {
            move_to(status, VerificationState::Failed, reason, now);
        }
    }
}

/// Administrative revocation, allowed from `Verified`, `Failed` and `Locked`
pub fn revoke(status: &mut VerificationStatus, reason: &str, now: DateTime<Utc>) -> DomainResult<()> {
    match status.state {
        VerificationState::Verified | VerificationState::Failed | VerificationState::Locked => {
            let reason = if reason.is_empty() { REVOKED_BY_ADMIN } else { reason };
            move_to(status, VerificationState::Revoked, reason, now);
            Ok(())
        }
        from => Err(DomainError::InvalidTransition {
            from,
            to: VerificationState::Revoked,
        }),
    }
}

/// Manual reset to a fresh `Pending` flow
pub fn reset(status: &mut VerificationStatus, now: DateTime<Utc>) {
    move_to(status, VerificationState::Pending, RESET_BY_ADMIN, now);
    status.retry_count = 0;
    status.notification_sent = false;
}

fn lock(status: &mut VerificationStatus, cause: &str, now: DateTime<Utc>) {
    let reason = format!("{}: {}", LOCKOUT_PREFIX, cause);
    move_to(status, VerificationState::Locked, &reason, now);
    status.notification_sent = true;
}

fn move_to(status: &mut VerificationStatus, state: VerificationState, reason: &str, now: DateTime<Utc>) {
    status.state = state;
    status.reason = reason.to_string();
    status.timestamp = now;
}
