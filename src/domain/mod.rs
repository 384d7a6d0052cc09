//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, events, errors)
//! - `characteristic` - Per-user role scores and quiz state
//! - `group` - Group listings, derived group profiles, lifecycle events
//! - `quiz` - Answer weighting and quiz scoring
//! - `matching` - Aggregation, variance-reduction scoring, hard filters

pub mod characteristic;
pub mod foundation;
pub mod group;
pub mod matching;
pub mod quiz;
