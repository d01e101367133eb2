//! Use-Case Library Adapters
//!
//! - **YamlUseCaseLibrary** - catalog read from a YAML file
//! - **StaticUseCaseLibrary** - fixed catalog (built-in or test data)

mod static_library;
mod yaml_library;

pub use static_library::StaticUseCaseLibrary;
pub use yaml_library::{parse_library, YamlUseCaseLibrary};
