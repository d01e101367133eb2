//! Recommendation module - lexical ranking of candidate use-cases.
//!
//! Pure functions only: tokenization, scoring and merging never touch
//! storage, so every projection can recompute recommendations freely.

mod engine;
mod merge;
mod stop_words;
mod tokenizer;

pub use engine::{Recommendation, RecommendationEngine, RecommendationLimits};
pub use merge::{merge_ranked, Ranked};
pub use stop_words::{is_stop_word, STOP_WORDS};
pub use tokenizer::{TokenSet, Tokenizer};
