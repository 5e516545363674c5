//! Verification status: outcome and state of one verification flow.
//!
//! The status is plain data. Policy over the state tag lives in the free
//! functions of this module and the transition table lives in the
//! verification service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Failed verifications after which a flow locks
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Hours after the last transition at which a status goes stale
pub const DEFAULT_STALE_AFTER_HOURS: i64 = 24;

/// States of a verification flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationState {
    Pending,
    Verified,
    Failed,
    Expired,
    Revoked,
    Locked,
    AwaitingReview,
}

impl VerificationState {
    /// Convert to string representation for storage and display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
            Self::Revoked => "REVOKED",
            Self::Locked => "LOCKED",
            Self::AwaitingReview => "AWAITING_REVIEW",
        }
    }
}

impl std::fmt::Display for VerificationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// States no automatic path may leave
pub fn is_terminal(state: VerificationState) -> bool {
    matches!(state, VerificationState::Locked | VerificationState::Revoked)
}

/// States that need a human to look at the flow
pub fn requires_attention(state: VerificationState) -> bool {
    matches!(
        state,
        VerificationState::Locked | VerificationState::AwaitingReview
    )
}

/// States in which new verification requests are refused without evaluation
pub fn blocks_verification(state: VerificationState) -> bool {
    is_terminal(state) || state == VerificationState::AwaitingReview
}

/// States in which failures increase the retry counter
pub fn counts_retries(state: VerificationState) -> bool {
    matches!(
        state,
        VerificationState::Pending | VerificationState::Failed
    )
}

/// Outcome and state of a verification flow for one subject and purpose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStatus {
    /// Subject of the flow
    pub user_id: String,

    /// Purpose tag separating independent flows of the same subject
    pub purpose: String,

    /// Current state
    pub state: VerificationState,

    /// Why the flow is in its current state
    pub reason: String,

    /// Time of the last transition
    pub timestamp: DateTime<Utc>,

    /// Failures recorded against the flow
    pub retry_count: u32,

    /// Whether the subject was notified about a lockout
    pub notification_sent: bool,
}

impl VerificationStatus {
    /// A fresh flow in `Pending`
    pub fn pending(user_id: impl Into<String>, purpose: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            purpose: purpose.into(),
            state: VerificationState::Pending,
            reason: String::new(),
            timestamp: now,
            retry_count: 0,
            notification_sent: false,
        }
    }

    /// More than `stale_after` has passed since the last transition
    pub fn is_stale_at(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        now - self.timestamp > stale_after
    }

    /// Expired state, or stale so that re-verification is required
    pub fn is_expired_at(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        self.state == VerificationState::Expired || self.is_stale_at(now, stale_after)
    }

    /// [`VerificationStatus::is_expired_at`] with the default 24 hour window
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now(), Duration::hours(DEFAULT_STALE_AFTER_HOURS))
    }

    /// Another attempt is allowed under the given retry limit
    pub fn can_retry_with(&self, max_retries: u32) -> bool {
        self.retry_count < max_retries && self.state != VerificationState::Locked
    }

    /// [`VerificationStatus::can_retry_with`] with the default limit of 3
    pub fn can_retry(&self) -> bool {
        self.can_retry_with(DEFAULT_MAX_RETRIES)
    }
}
