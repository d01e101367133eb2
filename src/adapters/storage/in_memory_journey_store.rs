//! In-Memory Journey Store Adapter
//!
//! Stores organizations and journeys in memory.
//! Useful for testing and development; supports write-failure injection.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::domain::foundation::{JourneyId, OrganizationId};
use crate::domain::journey::{Journey, JourneyPatch, Organization};
use crate::ports::{JourneyChange, JourneyStore, OrganizationSnapshot, StoreError};

use super::ChangeFeed;

/// In-memory storage for organizations and journeys
#[derive(Debug, Clone, Default)]
pub struct InMemoryJourneyStore {
    organizations: Arc<RwLock<HashMap<OrganizationId, Organization>>>,
    journeys: Arc<RwLock<HashMap<JourneyId, Journey>>>,
    feed: ChangeFeed,
    failing_writes: Arc<AtomicUsize>,
    save_calls: Arc<AtomicUsize>,
}

impl InMemoryJourneyStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an organization
    pub async fn put_organization(&self, organization: Organization) {
        self.organizations
            .write()
            .await
            .insert(organization.id, organization);
    }

    /// Insert or replace a journey without broadcasting
    pub async fn put_journey(&self, journey: Journey) {
        self.journeys.write().await.insert(journey.id, journey);
    }

    /// Make the next `count` writes fail with `StoreError::Unavailable`
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// Number of `save_fields` calls, failed ones included
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Get the number of stored journeys
    pub async fn journey_count(&self) -> usize {
        self.journeys.read().await.len()
    }

    fn take_injected_failure(&self) -> Result<(), StoreError> {
        let consumed = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match consumed {
            Ok(_) => Err(StoreError::Unavailable("injected write failure".to_string())),
            Err(_) => Ok(()),
        }
    }
}

#[async_trait]
impl JourneyStore for InMemoryJourneyStore {
    async fn load(&self, organization_id: &OrganizationId) -> Result<OrganizationSnapshot, StoreError> {
        let organization = self
            .organizations
            .read()
            .await
            .get(organization_id)
            .cloned()
            .ok_or(StoreError::OrganizationNotFound(*organization_id))?;

        let journeys = self
            .journeys
            .read()
            .await
            .values()
            .filter(|j| j.organization_id == *organization_id)
            .cloned()
            .collect();

        Ok(OrganizationSnapshot {
            organization,
            journeys,
        })
    }

    async fn load_journey(&self, journey_id: &JourneyId) -> Result<Journey, StoreError> {
        self.journeys
            .read()
            .await
            .get(journey_id)
            .cloned()
            .ok_or(StoreError::JourneyNotFound(*journey_id))
    }

    async fn create_journey(&self, journey: &Journey) -> Result<(), StoreError> {
        self.take_injected_failure()?;
        let mut journeys = self.journeys.write().await;
        if journeys.contains_key(&journey.id) {
            return Err(StoreError::AlreadyExists(journey.id));
        }
        journeys.insert(journey.id, journey.clone());
        Ok(())
    }

    async fn save_fields(&self, journey_id: &JourneyId, patch: &JourneyPatch) -> Result<(), StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.take_injected_failure()?;

        let organization_id = {
            let mut journeys = self.journeys.write().await;
            let journey = journeys
                .get_mut(journey_id)
                .ok_or(StoreError::JourneyNotFound(*journey_id))?;
            journey.apply_patch(patch);
            journey.organization_id
        };

        self.feed.publish(JourneyChange {
            organization_id,
            journey_id: *journey_id,
            patch: patch.clone(),
        });
        Ok(())
    }

    fn subscribe(&self, organization_id: &OrganizationId) -> broadcast::Receiver<JourneyChange> {
        self.feed.subscribe(organization_id)
    }
}
