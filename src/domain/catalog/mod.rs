//! Catalog module - Candidate use-cases and the merged candidate pool.
//!
//! Use-cases come from two places: the static library shipped with the
//! application and items authored for a specific organization. Both merge
//! into a single `CandidatePool` keyed by id.

mod pool;
mod use_case;

pub use pool::CandidatePool;
pub use use_case::{UseCase, UseCaseSource};
