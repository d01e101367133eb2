//! UseCase - a candidate work item scoped to one business domain.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{UseCaseId, ValidationError};

/// Where a use-case entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCaseSource {
    /// Static catalog shipped with the application.
    #[default]
    Library,
    /// Authored for a single organization.
    Organization,
}

/// A catalog entry describing a potential automation opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCase {
    pub id: UseCaseId,
    pub title: String,
    pub domain: String,
    /// Sub-category within the domain.
    #[serde(default)]
    pub process: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: UseCaseSource,
}

impl UseCase {
    /// Creates a library use-case, validating the required fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        domain: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let domain = domain.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if domain.trim().is_empty() {
            return Err(ValidationError::empty_field("domain"));
        }
        Ok(Self {
            id: UseCaseId::new(id)?,
            title,
            domain,
            process: String::new(),
            description: String::new(),
            source: UseCaseSource::Library,
        })
    }

    /// Sets the process (sub-category).
    pub fn with_process(mut self, process: impl Into<String>) -> Self {
        self.process = process.into();
        self
    }

    /// Sets the free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the entry as organization-authored.
    pub fn authored(mut self) -> Self {
        self.source = UseCaseSource::Organization;
        self
    }

    /// Text scored against notes: title, process and description.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.title, self.process, self.description)
    }
}
