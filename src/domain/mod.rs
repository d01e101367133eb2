//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors, timestamps, ownership)
//! - `catalog` - Candidate use-cases and the merged candidate pool
//! - `recommendation` - Tokenizer and lexical recommendation engine
//! - `steps` - Backbone steps, visibility settings, step list building
//! - `journey` - Organizations, journeys, payloads and their projection
//! - `custom_output` - Chat context, CSV and outline rendering for custom steps

pub mod catalog;
pub mod custom_output;
pub mod foundation;
pub mod journey;
pub mod recommendation;
pub mod steps;
