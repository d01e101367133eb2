//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the engagement journey domain.

mod errors;
mod ids;
mod ownership;
mod session_phase;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CustomStepId, JourneyId, MeetingId, NoteId, OrganizationId, UseCaseId, UserId};
pub use ownership::OwnedByUser;
pub use session_phase::SessionPhase;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
