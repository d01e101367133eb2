//! Engagement Journey - phase tracking and note-driven use-case recommendations
//!
//! An operator walks an organization through a fixed backbone of phases
//! (research, targeting, kickoff, hypotheses, functional reviews, ...) plus
//! custom steps. Notes gathered along the way are tokenized and scored
//! against a catalog of candidate use-cases to produce ranked, explained
//! recommendations.
//!
//! - `domain` - pure types and algorithms
//! - `ports` - collaborator interfaces (store, extraction, AI, catalog)
//! - `adapters` - port implementations
//! - `application` - `JourneySession` and `CustomStepManager`

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
