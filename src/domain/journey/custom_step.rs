//! Custom steps - operator-defined journey extensions with typed outputs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::{CustomStepId, Timestamp, ValidationError};

/// Phase label shown for every custom step.
pub const CUSTOM_PHASE_LABEL: &str = "Custom";

/// Model used when a draft does not name one.
pub const DEFAULT_MODEL_ID: &str = "claude-sonnet-4-20250514";

/// Output contract discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    Chat,
    Tabular,
    Presentation,
}

impl OutputType {
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputType::Chat => "Chat",
            OutputType::Tabular => "Tabular",
            OutputType::Presentation => "Presentation",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A spreadsheet template attached to a tabular step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub attached_at: Timestamp,
}

/// What a custom step produces.
///
/// A template exists only for tabular steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepOutput {
    Chat,
    Tabular {
        #[serde(default)]
        template: Option<TemplateAttachment>,
    },
    Presentation,
}

impl StepOutput {
    pub fn output_type(&self) -> OutputType {
        match self {
            StepOutput::Chat => OutputType::Chat,
            StepOutput::Tabular { .. } => OutputType::Tabular,
            StepOutput::Presentation => OutputType::Presentation,
        }
    }
}

impl From<OutputType> for StepOutput {
    fn from(output_type: OutputType) -> Self {
        match output_type {
            OutputType::Chat => StepOutput::Chat,
            OutputType::Tabular => StepOutput::Tabular { template: None },
            OutputType::Presentation => StepOutput::Presentation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: Timestamp,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            sent_at: Timestamp::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            sent_at: Timestamp::now(),
        }
    }
}

/// Editable fields of a custom step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomStepDraft {
    pub title: String,
    pub description: Option<String>,
    pub model_id: String,
    pub prompt: Option<String>,
    pub document_ids: Vec<String>,
    pub transcript_ids: Vec<String>,
    pub output_type: OutputType,
}

impl CustomStepDraft {
    pub fn new(title: impl Into<String>, output_type: OutputType) -> Self {
        Self {
            title: title.into(),
            description: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            prompt: None,
            document_ids: Vec::new(),
            transcript_ids: Vec::new(),
            output_type,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_documents(mut self, ids: Vec<String>) -> Self {
        self.document_ids = ids;
        self
    }

    pub fn with_transcripts(mut self, ids: Vec<String>) -> Self {
        self.transcript_ids = ids;
        self
    }

    fn validated_title(&self) -> Result<String, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(title.to_string())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// An operator-defined step attached to one journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomStep {
    pub id: CustomStepId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub phase: String,
    pub model_id: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub document_ids: Vec<String>,
    #[serde(default)]
    pub transcript_ids: Vec<String>,
    pub output: StepOutput,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Persisted chat transcript, chat steps only.
    #[serde(default)]
    pub transcript: Option<Vec<ChatTurn>>,
}

impl CustomStep {
    pub fn from_draft(draft: CustomStepDraft, now: Timestamp) -> Result<Self, ValidationError> {
        let title = draft.validated_title()?;
        Ok(Self {
            id: CustomStepId::new(),
            title,
            description: non_blank(draft.description),
            phase: CUSTOM_PHASE_LABEL.to_string(),
            model_id: draft.model_id,
            prompt: non_blank(draft.prompt),
            document_ids: draft.document_ids,
            transcript_ids: draft.transcript_ids,
            output: draft.output_type.into(),
            created_at: now,
            updated_at: now,
            transcript: None,
        })
    }

    pub fn output_type(&self) -> OutputType {
        self.output.output_type()
    }

    pub fn to_draft(&self) -> CustomStepDraft {
        CustomStepDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            model_id: self.model_id.clone(),
            prompt: self.prompt.clone(),
            document_ids: self.document_ids.clone(),
            transcript_ids: self.transcript_ids.clone(),
            output_type: self.output_type(),
        }
    }

    /// Replaces the editable fields.
    ///
    /// Keeping the output type keeps any template and transcript; changing
    /// it drops them.
    pub fn apply_draft(&mut self, draft: CustomStepDraft, now: Timestamp) -> Result<(), ValidationError> {
        let title = draft.validated_title()?;
        if draft.output_type != self.output_type() {
            self.output = draft.output_type.into();
            self.transcript = None;
        }
        self.title = title;
        self.description = non_blank(draft.description);
        self.model_id = draft.model_id;
        self.prompt = non_blank(draft.prompt);
        self.document_ids = draft.document_ids;
        self.transcript_ids = draft.transcript_ids;
        self.updated_at = now;
        Ok(())
    }

    /// Sets the template of a tabular step. Returns false for other types.
    pub fn attach_template(&mut self, attachment: TemplateAttachment, now: Timestamp) -> bool {
        match &mut self.output {
            StepOutput::Tabular { template } => {
                *template = Some(attachment);
                self.updated_at = now;
                true
            }
            StepOutput::Chat | StepOutput::Presentation => false,
        }
    }

    pub fn template(&self) -> Option<&TemplateAttachment> {
        match &self.output {
            StepOutput::Tabular { template } => template.as_ref(),
            StepOutput::Chat | StepOutput::Presentation => None,
        }
    }
}

/// Id-keyed arena of a journey's custom steps.
///
/// Insertion order is kept only for presentation; lookups go by id.
/// Serialized as a plain ordered list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CustomStep>", into = "Vec<CustomStep>")]
pub struct CustomSteps {
    order: Vec<CustomStepId>,
    by_id: HashMap<CustomStepId, CustomStep>,
}

impl CustomSteps {
    pub fn insert(&mut self, step: CustomStep) {
        if !self.by_id.contains_key(&step.id) {
            self.order.push(step.id);
        }
        self.by_id.insert(step.id, step);
    }

    pub fn get(&self, id: &CustomStepId) -> Option<&CustomStep> {
        self.by_id.get(id)
    }

    pub fn get_mut(&mut self, id: &CustomStepId) -> Option<&mut CustomStep> {
        self.by_id.get_mut(id)
    }

    pub fn remove(&mut self, id: &CustomStepId) -> Option<CustomStep> {
        let removed = self.by_id.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Steps in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CustomStep> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl From<Vec<CustomStep>> for CustomSteps {
    fn from(steps: Vec<CustomStep>) -> Self {
        let mut arena = CustomSteps::default();
        for step in steps {
            arena.insert(step);
        }
        arena
    }
}

impl From<CustomSteps> for Vec<CustomStep> {
    fn from(mut arena: CustomSteps) -> Self {
        arena
            .order
            .iter()
            .filter_map(|id| arena.by_id.remove(id))
            .collect()
    }
}
