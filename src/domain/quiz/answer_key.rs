//! Quiz answers and the per-option role weighting table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::characteristic::Role;
use crate::domain::foundation::ValidationError;

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question_id: String,
    pub option_id: String,
}

impl QuizAnswer {
    pub fn new(question_id: impl Into<String>, option_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            option_id: option_id.into(),
        }
    }
}

/// Rejects empty ids and questions answered twice.
///
/// Runs before scoring so a malformed submission is never partially applied.
pub fn validate_answers(answers: &[QuizAnswer]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(answers.len());
    for answer in answers {
        if answer.question_id.trim().is_empty() {
            return Err(ValidationError::empty_field("question_id"));
        }
        if answer.option_id.trim().is_empty() {
            return Err(ValidationError::empty_field("option_id"));
        }
        if !seen.insert(answer.question_id.as_str()) {
            return Err(ValidationError::duplicate_entry("answers", &answer.question_id));
        }
    }
    Ok(())
}

/// Per-role contribution of choosing one option.
pub type RoleWeights = BTreeMap<Role, f64>;

/// Weighting table: question id → option id → role weights.
///
/// ```yaml
/// questions:
///   q1:
///     a: { LEADER: 0.4, PLANNER: 0.1 }
///     b: { CREATIVE: 0.5 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerKey {
    questions: BTreeMap<String, BTreeMap<String, RoleWeights>>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the weights for one option of one question.
    pub fn with_option(
        mut self,
        question_id: impl Into<String>,
        option_id: impl Into<String>,
        weights: impl IntoIterator<Item = (Role, f64)>,
    ) -> Self {
        self.questions
            .entry(question_id.into())
            .or_default()
            .insert(option_id.into(), weights.into_iter().collect());
        self
    }

    /// Number of questions a complete attempt must answer.
    pub fn total_questions(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    pub fn has_question(&self, question_id: &str) -> bool {
        self.questions.contains_key(question_id)
    }

    /// Weights for an option, `None` if the question or option is unknown.
    pub fn weights(&self, question_id: &str, option_id: &str) -> Option<&RoleWeights> {
        self.questions.get(question_id)?.get(option_id)
    }

    /// Checks every question has options and every weight is finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (question_id, options) in &self.questions {
            if options.is_empty() {
                return Err(ValidationError::invalid_format(
                    "answer_key",
                    format!("question '{}' has no options", question_id),
                ));
            }
            for (option_id, weights) in options {
                if let Some((role, _)) = weights.iter().find(|(_, w)| !w.is_finite()) {
                    return Err(ValidationError::invalid_format(
                        "answer_key",
                        format!(
                            "non-finite weight for {} on {}/{}",
                            role, question_id, option_id
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_answers_rejects_duplicates() {
        let answers = vec![QuizAnswer::new("q1", "a"), QuizAnswer::new("q1", "b")];
        let err = validate_answers(&answers).unwrap_err();
        assert_eq!(err, ValidationError::duplicate_entry("answers", "q1"));
    }

    #[test]
    fn validate_answers_rejects_blank_ids() {
        assert!(validate_answers(&[QuizAnswer::new(" ", "a")]).is_err());
        assert!(validate_answers(&[QuizAnswer::new("q1", "")]).is_err());
    }

    #[test]
    fn validate_answers_accepts_empty_submission() {
        assert!(validate_answers(&[]).is_ok());
    }

    #[test]
    fn key_counts_questions_not_options() {
        let key = AnswerKey::new()
            .with_option("q1", "a", [(Role::Leader, 0.5)])
            .with_option("q1", "b", [(Role::Planner, 0.5)])
            .with_option("q2", "a", [(Role::Expert, 0.5)]);
        assert_eq!(key.total_questions(), 2);
        assert!(key.weights("q1", "b").is_some());
        assert!(key.weights("q1", "z").is_none());
        assert!(key.weights("q9", "a").is_none());
    }

    #[test]
    fn validate_rejects_non_finite_weights() {
        let key = AnswerKey::new().with_option("q1", "a", [(Role::Leader, f64::NAN)]);
        assert!(key.validate().is_err());
    }

    #[test]
    fn deserializes_from_yaml() {
        let yaml = r#"
questions:
  q1:
    a: { LEADER: 0.4, PLANNER: 0.1 }
    b: { CREATIVE: 0.5 }
  q2:
    a: { TEAM_PLAYER: 0.3 }
"#;
        let key: AnswerKey = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(key.total_questions(), 2);
        assert_eq!(key.weights("q1", "a").unwrap().get(&Role::Leader), Some(&0.4));
        assert_eq!(key.weights("q2", "a").unwrap().get(&Role::TeamPlayer), Some(&0.3));
        assert!(key.validate().is_ok());
    }
}
