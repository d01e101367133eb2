//! Resolved labels of the material a custom step references.

use crate::domain::journey::{CustomStep, Journey};

/// Human-readable labels of a step's referenced documents and transcripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepSources {
    pub documents: Vec<String>,
    pub transcripts: Vec<String>,
}

impl StepSources {
    /// Resolves the step's ids against the journey. Unknown ids are skipped.
    pub fn resolve(journey: &Journey, step: &CustomStep) -> Self {
        Self {
            documents: journey.document_labels(&step.document_ids),
            transcripts: journey.transcript_labels(&step.transcript_ids),
        }
    }
}
