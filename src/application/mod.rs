//! Application layer - Session transitions and custom step services.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! `JourneySession` owns the optimistic commit contract; `CustomStepManager`
//! builds on it for operator-defined steps.

pub mod custom_steps;
pub mod session;

pub use custom_steps::{CsvExport, CustomStepManager};
pub use session::{IngestReport, JourneySession, SummaryOutcome};
