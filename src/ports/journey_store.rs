//! Journey Store Port - Interface for persisting organizations and journeys.
//!
//! The store owns the organization record and every journey record. Writes
//! are field-level (`save_fields`) and last-writer-wins; other clients
//! observe them through `subscribe`.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::foundation::{DomainError, ErrorCode, JourneyId, OrganizationId};
use crate::domain::journey::{Journey, JourneyPatch, Organization};

/// Errors that can occur during store operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    #[error("Journey not found: {0}")]
    JourneyNotFound(JourneyId),

    #[error("Journey already exists: {0}")]
    AlreadyExists(JourneyId),

    #[error("Failed to serialize record: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize record: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::OrganizationNotFound(_) => ErrorCode::OrganizationNotFound,
            StoreError::JourneyNotFound(_) => ErrorCode::JourneyNotFound,
            _ => ErrorCode::PersistenceFailed,
        };
        DomainError::new(code, err.to_string())
    }
}

/// An organization together with all of its journeys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSnapshot {
    pub organization: Organization,
    pub journeys: Vec<Journey>,
}

/// A committed field-level write, as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyChange {
    pub organization_id: OrganizationId,
    pub journey_id: JourneyId,
    pub patch: JourneyPatch,
}

/// Port for loading and saving journey records
#[async_trait]
pub trait JourneyStore: Send + Sync {
    /// Load an organization and all its journeys
    ///
    /// # Errors
    /// Returns `StoreError::OrganizationNotFound` if the organization is unknown
    async fn load(&self, organization_id: &OrganizationId) -> Result<OrganizationSnapshot, StoreError>;

    /// Load a single journey
    async fn load_journey(&self, journey_id: &JourneyId) -> Result<Journey, StoreError>;

    /// Persist a newly created journey
    async fn create_journey(&self, journey: &Journey) -> Result<(), StoreError>;

    /// Overwrite the fields carried by `patch`
    ///
    /// Successful writes are broadcast to subscribers of the journey's
    /// organization.
    async fn save_fields(&self, journey_id: &JourneyId, patch: &JourneyPatch) -> Result<(), StoreError>;

    /// Subscribe to committed writes for an organization's journeys
    fn subscribe(&self, organization_id: &OrganizationId) -> broadcast::Receiver<JourneyChange>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_map_to_not_found_codes() {
        let err: DomainError = StoreError::JourneyNotFound(JourneyId::new()).into();
        assert_eq!(err.code, ErrorCode::JourneyNotFound);

        let err: DomainError = StoreError::OrganizationNotFound(OrganizationId::new()).into();
        assert_eq!(err.code, ErrorCode::OrganizationNotFound);
    }

    #[test]
    fn other_errors_are_persistence_failures() {
        let err: DomainError = StoreError::Unavailable("connection reset".to_string()).into();
        assert_eq!(err.code, ErrorCode::PersistenceFailed);
        assert!(err.message.contains("connection reset"));
    }
}
