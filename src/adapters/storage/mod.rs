//! Storage Adapters
//!
//! Implementations of the JourneyStore port.
//!
//! ## Available Adapters
//!
//! - **FileJourneyStore** - Stores records as JSON files on disk
//! - **InMemoryJourneyStore** - Stores records in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileJourneyStore, InMemoryJourneyStore};
//!
//! // Production: file-based storage
//! let store = FileJourneyStore::new("./data");
//!
//! // Testing: in-memory storage
//! let store = InMemoryJourneyStore::new();
//! ```

mod change_feed;
mod file_journey_store;
mod in_memory_journey_store;

pub use change_feed::ChangeFeed;
pub use file_journey_store::FileJourneyStore;
pub use in_memory_journey_store::InMemoryJourneyStore;
