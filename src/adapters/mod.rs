//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - AI provider implementations (Anthropic, mock)
//! - `storage` - JourneyStore implementations (file, in-memory)
//! - `extraction` - TextExtractor implementations
//! - `catalog` - UseCaseLibrary implementations

pub mod ai;
pub mod catalog;
pub mod extraction;
pub mod storage;

pub use ai::{AnthropicConfig, AnthropicProvider, MockAIProvider, MockError};
pub use catalog::{StaticUseCaseLibrary, YamlUseCaseLibrary};
pub use extraction::PlainTextExtractor;
pub use storage::{FileJourneyStore, InMemoryJourneyStore};
