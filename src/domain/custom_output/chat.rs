//! Chat context assembly for chat custom steps.

use crate::domain::journey::{ChatTurn, CustomStep};

use super::StepSources;

/// Assistant turn appended when the completion call fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I wasn't able to generate a response just now. Please try again in a moment.";

/// Everything the completion call needs for one chat send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub model_id: String,
    pub system_prompt: String,
    pub turns: Vec<ChatTurn>,
}

impl ChatContext {
    /// Builds the context from the step definition and the running transcript.
    pub fn build(step: &CustomStep, sources: &StepSources, transcript: &[ChatTurn]) -> Self {
        let mut lines = vec![
            format!("You are assisting with the custom engagement step \"{}\".", step.title),
        ];
        if let Some(description) = &step.description {
            lines.push(format!("Step description: {}", description));
        }
        if let Some(prompt) = &step.prompt {
            lines.push(format!("Step instructions: {}", prompt));
        }
        if !sources.documents.is_empty() {
            lines.push(format!("Referenced documents: {}", sources.documents.join(", ")));
        }
        if !sources.transcripts.is_empty() {
            lines.push(format!("Referenced transcripts: {}", sources.transcripts.join(", ")));
        }

        Self {
            model_id: step.model_id.clone(),
            system_prompt: lines.join("\n"),
            turns: transcript.to_vec(),
        }
    }
}
