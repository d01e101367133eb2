//! Journey module - organizations, journeys and their phase payloads.
//!
//! Everything here is a pure value or a pure function of one. The
//! application layer drives persistence around these types.

mod aggregate;
mod custom_step;
mod hypotheses;
mod note;
mod organization;
mod patch;
mod phase;
mod view;

pub use aggregate::Journey;
pub use custom_step::{
    ChatRole, ChatTurn, CustomStep, CustomStepDraft, CustomSteps, OutputType, StepOutput,
    TemplateAttachment, CUSTOM_PHASE_LABEL, DEFAULT_MODEL_ID,
};
pub use hypotheses::HypothesisBuilder;
pub use note::{Meeting, MeetingDraft, Note, UploadedFile};
pub use organization::Organization;
pub use patch::JourneyPatch;
pub use phase::{FunctionalStage, SelectionPhase};
pub use view::{JourneyView, SelectionView};
