//! Steps module - the fixed backbone plus operator-defined custom steps.
//!
//! - `backbone` - the nine ordered phases and their settings keys
//! - `settings` - global visibility flags
//! - `registry` - builds the visible, lock-annotated step list

mod backbone;
mod registry;
mod settings;

pub use backbone::BackboneStep;
pub use registry::{build_steps, select, StepKey, StepProgress, StepView};
pub use settings::StepSettings;
