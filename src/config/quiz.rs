//! Quiz configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizConfig {
    /// YAML answer key; the built-in key is used when unset
    pub answer_key_path: Option<PathBuf>,
}

impl QuizConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = &self.answer_key_path {
            if path.as_os_str().is_empty() {
                return Err(ValidationError::MissingRequired("quiz.answer_key_path"));
            }
        }
        Ok(())
    }
}
