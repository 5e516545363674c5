//! Per-flow status slots
//!
//! Each (subject, purpose) pair owns one async mutex holding its status.
//! Holding the mutex for the whole evaluation serialises transitions and
//! counter updates of that flow while other flows proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::entities::VerificationStatus;

use super::types::StatusKey;

type Slot = Arc<Mutex<Option<VerificationStatus>>>;

#[derive(Default)]
pub(crate) struct StatusRegistry {
    slots: RwLock<HashMap<StatusKey, Slot>>,
}

impl StatusRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Lock the slot of a flow, creating an empty slot on first use
    pub(crate) async fn lock(&self, key: &StatusKey) -> OwnedMutexGuard<Option<VerificationStatus>> {
        self.slot(key).await.lock_owned().await
    }

    /// Lock the slot of a flow only if the flow is known
    pub(crate) async fn lock_existing(
        &self,
        key: &StatusKey,
    ) -> Option<OwnedMutexGuard<Option<VerificationStatus>>> {
        let slot = {
            let slots = self.slots.read().await;
            slots.get(key).cloned()
        }?;
        Some(slot.lock_owned().await)
    }

    /// Copy of the current status; waits for an in-flight transition
    pub(crate) async fn snapshot(&self, key: &StatusKey) -> Option<VerificationStatus> {
        let guard = self.lock_existing(key).await?;
        guard.clone()
    }

    async fn slot(&self, key: &StatusKey) -> Slot {
        {
            let slots = self.slots.read().await;
            if let Some(slot) = slots.get(key) {
                return Arc::clone(slot);
            }
        }

        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}
