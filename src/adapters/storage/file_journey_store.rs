//! File-based Journey Store Adapter
//!
//! Stores each organization and each journey as a JSON file:
//!
//! ```text
//! <base>/organizations/<organization_id>.json
//! <base>/journeys/<journey_id>.json
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{broadcast, Mutex};

use crate::domain::foundation::{JourneyId, OrganizationId};
use crate::domain::journey::{Journey, JourneyPatch, Organization};
use crate::ports::{JourneyChange, JourneyStore, OrganizationSnapshot, StoreError};

use super::ChangeFeed;

/// File-based storage for organizations and journeys
#[derive(Debug, Clone)]
pub struct FileJourneyStore {
    base_path: PathBuf,
    feed: ChangeFeed,
    /// Serializes read-modify-write cycles on journey files.
    write_lock: Arc<Mutex<()>>,
}

impl FileJourneyStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileJourneyStore::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            feed: ChangeFeed::default(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn organizations_dir(&self) -> PathBuf {
        self.base_path.join("organizations")
    }

    fn journeys_dir(&self) -> PathBuf {
        self.base_path.join("journeys")
    }

    fn organization_path(&self, id: &OrganizationId) -> PathBuf {
        self.organizations_dir().join(format!("{}.json", id))
    }

    fn journey_path(&self, id: &JourneyId) -> PathBuf {
        self.journeys_dir().join(format!("{}.json", id))
    }

    /// Write (or replace) an organization record
    pub async fn save_organization(&self, organization: &Organization) -> Result<(), StoreError> {
        write_json(&self.organization_path(&organization.id), organization).await
    }

    async fn write_journey(&self, journey: &Journey) -> Result<(), StoreError> {
        write_json(&self.journey_path(&journey.id), journey).await
    }

    async fn read_journey(&self, id: &JourneyId) -> Result<Journey, StoreError> {
        let path = self.journey_path(id);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StoreError::JourneyNotFound(*id));
        }
        read_json(&path).await
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;
    }

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

    fs::write(path, json)
        .await
        .map_err(|e| StoreError::IoError(e.to_string()))
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let json = fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::IoError(e.to_string()))?;

    serde_json::from_str(&json).map_err(|e| StoreError::DeserializationFailed(e.to_string()))
}

#[async_trait]
impl JourneyStore for FileJourneyStore {
    async fn load(&self, organization_id: &OrganizationId) -> Result<OrganizationSnapshot, StoreError> {
        let org_path = self.organization_path(organization_id);
        if !fs::try_exists(&org_path).await.unwrap_or(false) {
            return Err(StoreError::OrganizationNotFound(*organization_id));
        }
        let organization: Organization = read_json(&org_path).await?;

        let mut journeys = Vec::new();
        let dir = self.journeys_dir();
        if fs::try_exists(&dir).await.unwrap_or(false) {
            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| StoreError::IoError(e.to_string()))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::IoError(e.to_string()))?
            {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let journey: Journey = read_json(&path).await?;
                if journey.organization_id == *organization_id {
                    journeys.push(journey);
                }
            }
        }

        Ok(OrganizationSnapshot {
            organization,
            journeys,
        })
    }

    async fn load_journey(&self, journey_id: &JourneyId) -> Result<Journey, StoreError> {
        self.read_journey(journey_id).await
    }

    async fn create_journey(&self, journey: &Journey) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if fs::try_exists(self.journey_path(&journey.id)).await.unwrap_or(false) {
            return Err(StoreError::AlreadyExists(journey.id));
        }
        self.write_journey(journey).await
    }

    async fn save_fields(&self, journey_id: &JourneyId, patch: &JourneyPatch) -> Result<(), StoreError> {
        let organization_id = {
            let _guard = self.write_lock.lock().await;
            let mut journey = self.read_journey(journey_id).await?;
            journey.apply_patch(patch);
            self.write_journey(&journey).await?;
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
