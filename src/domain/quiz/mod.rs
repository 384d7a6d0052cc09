//! Quiz scoring module.
//!
//! The quiz UI is external; this module only turns finalized or partial
//! answer sets into role scores and a reliability fraction.

mod answer_key;
mod scoring;

pub use answer_key::{validate_answers, AnswerKey, QuizAnswer, RoleWeights};
pub use scoring::{QuizOutcome, QuizScoringAdapter};
