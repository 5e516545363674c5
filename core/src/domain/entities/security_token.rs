//! Security token entity: a time-bounded capability issued to a subject.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::RequestContext;

/// Default token lifetime (5 minutes)
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 300;

/// Common purpose tags
pub mod purposes {
    /// Interactive sign-in
    pub const LOGIN: &str = "login";
    /// Confirmation of a single financial transaction
    pub const TX_VERIFICATION: &str = "tx-verification";
    /// Re-verification before a subscription/membership change
    pub const SUBSCRIPTION_CHANGE: &str = "subscription-change";
}

/// A capability issued to a subject for a bounded time window
///
/// A token is usable iff it is active and the clock has not reached
/// `expires_at`. Expiry never flips `active`; only [`SecurityToken::deactivate`]
/// does, and deactivation is permanent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityToken {
    /// Opaque unique identifier handed to the caller
    pub token: String,

    /// Subject the token was issued to
    pub user_id: String,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,

    /// When the token stops being usable
    pub expires_at: DateTime<Utc>,

    /// Network address the token was issued to
    pub ip_address: String,

    /// Device the token was issued to
    pub device_info: String,

    /// Flow the token belongs to (e.g. "login", "tx-verification")
    pub purpose: String,

    /// Standard Base64 signature over [`SecurityToken::signing_payload`]
    pub signature: Option<String>,

    active: bool,

    failed_attempts: u32,
}

impl SecurityToken {
    /// Creates a new, active, unsigned token with a fresh identifier
    pub fn new(
        user_id: impl Into<String>,
        purpose: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        context: &RequestContext,
    ) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            issued_at,
            expires_at,
            ip_address: context.ip_address.clone(),
            device_info: context.device_info.clone(),
            purpose: purpose.into(),
            signature: None,
            active: true,
            failed_attempts: 0,
        }
    }

    /// Creates a token issued now that lives for `ttl`
    pub fn issued_now(
        user_id: impl Into<String>,
        purpose: impl Into<String>,
        ttl: Duration,
        context: &RequestContext,
    ) -> Self {
        let now = Utc::now();
        Self::new(user_id, purpose, now, now + ttl, context)
    }

    /// Attaches the embedded signature
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Canonical bytes covered by the embedded signature
    ///
    /// `token|user_id|purpose|issued_at|expires_at`, timestamps as unix seconds.
    /// The mutable fields (`active`, `failed_attempts`) are not covered.
    pub fn signing_payload(&self) -> Vec<u8> {
        format!(
            "{}|{}|{}|{}|{}",
            self.token,
            self.user_id,
            self.purpose,
            self.issued_at.timestamp(),
            self.expires_at.timestamp()
        )
        .into_bytes()
    }

    /// Checks expiry against the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks expiry against the current time
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether the token is active and not expired at `now`
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.active && !self.is_expired_at(now)
    }

    /// Whether the token is active and not expired right now
    pub fn is_active(&self) -> bool {
        self.is_usable_at(Utc::now())
    }

    /// Raw active flag, ignoring expiry
    pub fn is_deactivated(&self) -> bool {
        !self.active
    }

    /// Permanently deactivates the token
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Deactivates the token if it has expired at `now`
    ///
    /// Returns `true` when this call changed the flag.
    pub fn deactivate_if_expired(&mut self, now: DateTime<Utc>) -> bool {
        if self.active && self.is_expired_at(now) {
            self.active = false;
            return true;
        }
        false
    }

    /// Failed verifications recorded against this token
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Records one more failed verification, returning the new count
    pub fn increment_failed_attempts(&mut self) -> u32 {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.failed_attempts
    }

    /// Clears the failed verification counter
    pub fn reset_failed_attempts(&mut self) {
        self.failed_attempts = 0;
    }

    /// Remaining lifetime at `now`, clamped to zero
    pub fn time_until_expiry_at(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
