//! Per-organization broadcast of committed journey writes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

use crate::domain::foundation::OrganizationId;
use crate::ports::JourneyChange;

/// Buffered changes per organization before slow receivers start lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Lazily created broadcast channel per organization.
#[derive(Debug, Clone, Default)]
pub struct ChangeFeed {
    senders: Arc<Mutex<HashMap<OrganizationId, broadcast::Sender<JourneyChange>>>>,
}

impl ChangeFeed {
    pub fn subscribe(&self, organization_id: &OrganizationId) -> broadcast::Receiver<JourneyChange> {
        self.senders()
            .entry(*organization_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Sends to current subscribers. No subscribers is not an error.
    pub fn publish(&self, change: JourneyChange) {
        if let Some(sender) = self.senders().get(&change.organization_id) {
            let _ = sender.send(change);
        }
    }

    fn senders(&self) -> MutexGuard<'_, HashMap<OrganizationId, broadcast::Sender<JourneyChange>>> {
        // Poisoning is ignored: every critical section is a single map call.
        self.senders.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
