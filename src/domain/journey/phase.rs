//! Phase selectors for selection payloads and functional meetings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which selection payload a domain/use-case toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    Targeting,
    DeepDive,
}

impl fmt::Display for SelectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPhase::Targeting => write!(f, "targeting"),
            SelectionPhase::DeepDive => write!(f, "deep_dive"),
        }
    }
}

/// Functional stage: selects meeting lists and hypothesis inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionalStage {
    HighLevel,
    DeepDive,
}

impl FunctionalStage {
    /// The selection payload whose domains steer this stage's hypotheses.
    pub fn selection_phase(&self) -> SelectionPhase {
        match self {
            FunctionalStage::HighLevel => SelectionPhase::Targeting,
            FunctionalStage::DeepDive => SelectionPhase::DeepDive,
        }
    }
}

impl fmt::Display for FunctionalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionalStage::HighLevel => write!(f, "high_level"),
            FunctionalStage::DeepDive => write!(f, "deep_dive"),
        }
    }
}
