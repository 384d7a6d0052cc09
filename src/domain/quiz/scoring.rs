//! Converts raw quiz answers into role scores.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::characteristic::{reliability, QuizProgress, QuizStatus, Role, RoleVector};

use super::{AnswerKey, QuizAnswer};

/// Scored submission, ready to be applied to a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub scores: RoleVector,
    pub status: QuizStatus,
    pub progress: QuizProgress,
    pub reliability: f64,
}

/// Sums per-option role weights over answered questions.
///
/// Unknown questions and options are ignored: they weaken the signal but
/// never block onboarding.
#[derive(Debug, Clone)]
pub struct QuizScoringAdapter {
    key: Arc<AnswerKey>,
}

impl QuizScoringAdapter {
    pub fn new(key: Arc<AnswerKey>) -> Self {
        Self { key }
    }

    pub fn answer_key(&self) -> &AnswerKey {
        &self.key
    }

    pub fn score(&self, answers: &[QuizAnswer]) -> QuizOutcome {
        let total = self.key.total_questions();

        if answers.is_empty() {
            let progress = QuizProgress::saturating(0, total);
            return QuizOutcome {
                scores: RoleVector::zero(),
                status: QuizStatus::Skipped,
                progress,
                reliability: reliability(QuizStatus::Skipped, progress),
            };
        }

        let mut sums = [0.0_f64; Role::COUNT];
        let mut counted: HashSet<&str> = HashSet::new();

        for answer in answers {
            let Some(weights) = self.key.weights(&answer.question_id, &answer.option_id) else {
                tracing::debug!(
                    question_id = %answer.question_id,
                    option_id = %answer.option_id,
                    "ignoring unrecognized quiz answer"
                );
                continue;
            };
            if !counted.insert(answer.question_id.as_str()) {
                tracing::debug!(question_id = %answer.question_id, "ignoring repeated question");
                continue;
            }
            for (role, weight) in weights {
                sums[role.index()] += weight;
            }
        }

        let answered = u32::try_from(counted.len()).unwrap_or(u32::MAX);
        let status = if total > 0 && answered >= total {
            QuizStatus::Completed
        } else {
            QuizStatus::InProgress
        };
        let progress = QuizProgress::saturating(answered, total);

        QuizOutcome {
            scores: RoleVector::from_components(sums),
            status,
            progress,
            reliability: reliability(status, progress),
        }
    }
}
