//! BackboneStep enum representing the nine fixed journey phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed, ordered phases every journey walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackboneStep {
    Research,
    DomainTargeting,
    Kickoff,
    HighLevelHypotheses,
    HighLevelFunctionalReview,
    DeepDiveHypotheses,
    DeepDiveFunctionalReview,
    IntegrationDesign,
    DeliveryDocumentation,
}

impl BackboneStep {
    /// Returns all backbone steps in canonical order.
    pub fn all() -> &'static [BackboneStep] {
        &[
            BackboneStep::Research,
            BackboneStep::DomainTargeting,
            BackboneStep::Kickoff,
            BackboneStep::HighLevelHypotheses,
            BackboneStep::HighLevelFunctionalReview,
            BackboneStep::DeepDiveHypotheses,
            BackboneStep::DeepDiveFunctionalReview,
            BackboneStep::IntegrationDesign,
            BackboneStep::DeliveryDocumentation,
        ]
    }

    /// Returns the 0-based index of this step in the canonical order.
    pub fn order_index(&self) -> usize {
        *self as usize
    }

    /// Returns the next step in order, if any.
    pub fn next(&self) -> Option<BackboneStep> {
        Self::all().get(self.order_index() + 1).copied()
    }

    /// Stable key used in the step-visibility settings map.
    pub fn setting_key(&self) -> &'static str {
        match self {
            BackboneStep::Research => "research",
            BackboneStep::DomainTargeting => "domain_targeting",
            BackboneStep::Kickoff => "kickoff",
            BackboneStep::HighLevelHypotheses => "high_level_hypotheses",
            BackboneStep::HighLevelFunctionalReview => "high_level_functional_review",
            BackboneStep::DeepDiveHypotheses => "deep_dive_hypotheses",
            BackboneStep::DeepDiveFunctionalReview => "deep_dive_functional_review",
            BackboneStep::IntegrationDesign => "integration_design",
            BackboneStep::DeliveryDocumentation => "delivery_documentation",
        }
    }

    /// Looks a step up by its settings key.
    pub fn from_setting_key(key: &str) -> Option<BackboneStep> {
        Self::all().iter().copied().find(|s| s.setting_key() == key)
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            BackboneStep::Research => "Research",
            BackboneStep::DomainTargeting => "Domain Targeting",
            BackboneStep::Kickoff => "Kickoff",
            BackboneStep::HighLevelHypotheses => "High-Level Hypotheses",
            BackboneStep::HighLevelFunctionalReview => "High-Level Functional Review",
            BackboneStep::DeepDiveHypotheses => "Deep-Dive Hypotheses",
            BackboneStep::DeepDiveFunctionalReview => "Deep-Dive Functional Review",
            BackboneStep::IntegrationDesign => "Integration Design",
            BackboneStep::DeliveryDocumentation => "Delivery Documentation",
        }
    }

    /// Research is never hidden and never locked.
    pub fn is_research(&self) -> bool {
        matches!(self, BackboneStep::Research)
    }
}

impl fmt::Display for BackboneStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
