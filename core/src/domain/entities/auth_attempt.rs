//! Authentication attempt entity: one immutable fact per verification request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::RequestContext;

/// How a verification request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    /// Evidence was evaluated and rejected; the only kind that counts toward the retry limit
    Rejected,
    /// The presented token had expired
    Expired,
    /// A collaborator failed before the evidence could be judged
    Unavailable,
    /// The flow refused the request without evaluating it (locked, revoked, stale)
    Refused,
}

/// Record of a single verification request
///
/// Attempts are created once, appended to the attempt log and never changed
/// afterwards, so the type exposes accessors only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAttempt {
    attempt_id: Uuid,
    user_id: String,
    #[serde(default)]
    purpose: Option<String>,
    attempted_at: DateTime<Utc>,
    outcome: AttemptOutcome,
    ip_address: String,
    device_info: String,
    failure_reason: Option<String>,
    location: String,
}

impl AuthAttempt {
    /// A successful attempt recorded now
    pub fn succeeded(user_id: impl Into<String>, context: &RequestContext) -> Self {
        Self::build(user_id.into(), AttemptOutcome::Succeeded, None, context)
    }

    /// A failed attempt recorded now
    ///
    /// The reason is what makes a failed attempt count as suspicious, so an
    /// empty reason is stored as `None`.
    pub fn failed(
        user_id: impl Into<String>,
        reason: impl Into<String>,
        context: &RequestContext,
    ) -> Self {
        let reason = reason.into();
        let reason = if reason.is_empty() { None } else { Some(reason) };
        Self::build(user_id.into(), AttemptOutcome::Rejected, reason, context)
    }

    /// Tags the attempt with the flow it belongs to
    pub fn for_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Overrides the outcome kind of a failed attempt
    ///
    /// Has no effect on a successful attempt, and `Succeeded` cannot be set
    /// on a failed one.
    pub fn with_outcome(mut self, outcome: AttemptOutcome) -> Self {
        if self.is_success() || outcome == AttemptOutcome::Succeeded {
            return self;
        }
        self.outcome = outcome;
        self
    }

    /// Overrides the attempt time (import of historical records, tests)
    pub fn at(mut self, attempted_at: DateTime<Utc>) -> Self {
        self.attempted_at = attempted_at;
        self
    }

    fn build(
        user_id: String,
        outcome: AttemptOutcome,
        failure_reason: Option<String>,
        context: &RequestContext,
    ) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            user_id,
            purpose: None,
            attempted_at: Utc::now(),
            outcome,
            ip_address: context.ip_address.clone(),
            device_info: context.device_info.clone(),
            failure_reason,
            location: context.location.clone(),
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Flow the attempt belongs to, `None` for entries logged outside a flow
    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    pub fn attempted_at(&self) -> DateTime<Utc> {
        self.attempted_at
    }

    pub fn outcome(&self) -> AttemptOutcome {
        self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Succeeded
    }

    /// Whether the attempt raised the retry counter of its flow
    pub fn counts_toward_retry(&self) -> bool {
        self.outcome == AttemptOutcome::Rejected
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn device_info(&self) -> &str {
        &self.device_info
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// A failed attempt that carries a reason
    pub fn is_suspicious(&self) -> bool {
        !self.is_success() && self.failure_reason.as_deref().is_some_and(|r| !r.is_empty())
    }
}
