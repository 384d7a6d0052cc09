//! AnswerKeySource port - where quiz answer weights come from.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::quiz::AnswerKey;

/// Loads the question/option weighting table used by quiz scoring.
///
/// Implementations validate the key before returning it.
#[async_trait]
pub trait AnswerKeySource: Send + Sync {
    async fn load(&self) -> Result<AnswerKey, DomainError>;
}
