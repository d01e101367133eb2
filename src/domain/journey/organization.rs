//! Organization - the engagement target and owner of journeys.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{UseCase, UseCaseSource};
use crate::domain::foundation::{OrganizationId, OwnedByUser, UseCaseId, UserId, ValidationError};

/// A profiled organization.
///
/// Its `selected_domains` and `selected_use_cases` are the legacy default
/// selection that journeys fall back to when a phase has no value yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub owner_id: UserId,
    #[serde(default)]
    pub selected_domains: Vec<String>,
    #[serde(default)]
    pub selected_use_cases: Vec<UseCaseId>,
    /// Output of the research phase.
    #[serde(default)]
    pub research_profile: Option<String>,
    /// Use-cases authored for this organization only.
    #[serde(default)]
    pub use_cases: Vec<UseCase>,
}

impl Organization {
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: OrganizationId::new(),
            name,
            owner_id,
            selected_domains: Vec::new(),
            selected_use_cases: Vec::new(),
            research_profile: None,
            use_cases: Vec::new(),
        })
    }

    pub fn with_default_selection(
        mut self,
        domains: Vec<String>,
        use_cases: Vec<UseCaseId>,
    ) -> Self {
        self.selected_domains = domains;
        self.selected_use_cases = use_cases;
        self
    }

    pub fn with_research_profile(mut self, profile: impl Into<String>) -> Self {
        self.research_profile = Some(profile.into());
        self
    }

    /// Adds an organization-authored use-case.
    pub fn with_use_case(mut self, use_case: UseCase) -> Self {
        self.use_cases.push(UseCase {
            source: UseCaseSource::Organization,
            ..use_case
        });
        self
    }

    /// True when the research phase produced a non-blank profile.
    pub fn has_research_content(&self) -> bool {
        self.research_profile
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }
}

impl OwnedByUser for Organization {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    fn resource_type(&self) -> &'static str {
        "Organization"
    }
}
