//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `JourneyStore` - organization and journey persistence
//! - `TextExtractor` - plain text from uploaded files
//! - `AIProvider` - completions and note summaries
//! - `UseCaseLibrary` - the shared use-case catalog

mod ai_provider;
mod journey_store;
mod text_extractor;
mod use_case_library;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, NoteSummary, ProviderInfo, RequestMetadata, TokenUsage, SUMMARY_SYSTEM_PROMPT,
};
pub use journey_store::{JourneyChange, JourneyStore, OrganizationSnapshot, StoreError};
pub use text_extractor::{ExtractionError, TextExtractor};
pub use use_case_library::{LibraryError, UseCaseLibrary};
