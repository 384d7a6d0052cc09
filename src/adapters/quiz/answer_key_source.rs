//! Answer key sources: the built-in key and YAML files on disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::quiz::AnswerKey;
use crate::ports::AnswerKeySource;

const BUILTIN_ANSWER_KEY: &str = include_str!("../../../data/answer_key.yaml");

/// Serves an answer key held in memory.
#[derive(Debug, Clone)]
pub struct StaticAnswerKeySource {
    key: AnswerKey,
}

impl StaticAnswerKeySource {
    pub fn new(key: AnswerKey) -> Self {
        Self { key }
    }

    /// The key shipped with the crate.
    pub fn builtin() -> Result<Self, DomainError> {
        parse_answer_key(BUILTIN_ANSWER_KEY, "builtin").map(Self::new)
    }
}

#[async_trait]
impl AnswerKeySource for StaticAnswerKeySource {
    async fn load(&self) -> Result<AnswerKey, DomainError> {
        self.key.validate()?;
        Ok(self.key.clone())
    }
}

/// Reads an answer key from a YAML file on every `load`.
#[derive(Debug, Clone)]
pub struct YamlAnswerKeySource {
    path: PathBuf,
}

impl YamlAnswerKeySource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AnswerKeySource for YamlAnswerKeySource {
    async fn load(&self) -> Result<AnswerKey, DomainError> {
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::new(
                ErrorCode::StorageError,
                format!("Failed to read answer key {}: {}", self.path.display(), e),
            )
        })?;
        let key = parse_answer_key(&raw, &self.path.display().to_string())?;
        tracing::info!(
            path = %self.path.display(),
            questions = key.total_questions(),
            "loaded quiz answer key"
        );
        Ok(key)
    }
}

fn parse_answer_key(raw: &str, origin: &str) -> Result<AnswerKey, DomainError> {
    let key: AnswerKey = serde_yaml::from_str(raw).map_err(|e| {
        DomainError::new(
            ErrorCode::InvalidFormat,
            format!("Malformed answer key ({}): {}", origin, e),
        )
        .with_detail("origin", origin)
    })?;
    key.validate()?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::characteristic::Role;
    use std::io::Write;

    #[tokio::test]
    async fn builtin_key_is_valid() {
        let key = StaticAnswerKeySource::builtin().unwrap().load().await.unwrap();

        assert_eq!(key.total_questions(), 7);
        let weights = key.weights("group_project_start", "brainstorm").unwrap();
        assert_eq!(weights.get(&Role::Creative), Some(&0.35));
    }

    #[tokio::test]
    async fn loads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "questions:\n  q1:\n    a: {{ LEADER: 0.5 }}\n    b: {{ EXPERT: 0.5 }}"
        )
        .unwrap();

        let key = YamlAnswerKeySource::new(file.path()).load().await.unwrap();

        assert_eq!(key.total_questions(), 1);
        assert!(key.weights("q1", "b").is_some());
    }

    #[tokio::test]
    async fn missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = YamlAnswerKeySource::new(dir.path().join("absent.yaml"));

        let err = source.load().await.unwrap_err();

        assert_eq!(err.code, ErrorCode::StorageError);
    }

    #[tokio::test]
    async fn malformed_yaml_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "questions: [not, a, map]").unwrap();

        let err = YamlAnswerKeySource::new(file.path()).load().await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn question_without_options_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "questions:\n  q1: {{}}").unwrap();

        let err = YamlAnswerKeySource::new(file.path()).load().await.unwrap_err();

        assert!(err.is_validation());
    }
}
