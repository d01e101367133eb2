//! Custom output module - renders custom steps into their output contracts.

mod chat;
mod presentation;
mod sources;
mod tabular;

pub use chat::{ChatContext, FALLBACK_REPLY};
pub use presentation::render_outline;
pub use sources::StepSources;
pub use tabular::{csv_file_name, render_csv};
