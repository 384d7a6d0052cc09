//! Quiz completion state and the reliability derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Where a user is in the characteristic quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizStatus {
    NotStarted,
    InProgress,
    Completed,
    Skipped,
}

impl QuizStatus {
    /// True when a new submission starts a fresh attempt rather than continuing one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, QuizStatus::Completed | QuizStatus::Skipped)
    }
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuizStatus::NotStarted => "NOT_STARTED",
            QuizStatus::InProgress => "IN_PROGRESS",
            QuizStatus::Completed => "COMPLETED",
            QuizStatus::Skipped => "SKIPPED",
        };
        f.write_str(s)
    }
}

/// Answered-versus-total question counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuizProgress {
    answered: u32,
    total: u32,
}

impl QuizProgress {
    /// Creates progress, rejecting `answered > total`.
    pub fn new(answered: u32, total: u32) -> Result<Self, ValidationError> {
        if answered > total {
            return Err(ValidationError::out_of_range(
                "answered_questions",
                0,
                i64::from(total),
                i64::from(answered),
            ));
        }
        Ok(Self { answered, total })
    }

    /// Creates progress, capping `answered` at `total`.
    pub fn saturating(answered: u32, total: u32) -> Self {
        Self {
            answered: answered.min(total),
            total,
        }
    }

    pub fn answered(&self) -> u32 {
        self.answered
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// `answered / total`, 0 when the quiz has no questions.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.answered) / f64::from(self.total)
        }
    }
}

/// Confidence weight for a profile, a pure function of status and progress.
///
/// NOT_STARTED and SKIPPED → 0, COMPLETED → 1, IN_PROGRESS → answered/total.
pub fn reliability(status: QuizStatus, progress: QuizProgress) -> f64 {
    match status {
        QuizStatus::NotStarted | QuizStatus::Skipped => 0.0,
        QuizStatus::Completed => 1.0,
        QuizStatus::InProgress => progress.fraction().clamp(0.0, 1.0),
    }
}
