//! CharacteristicProfile aggregate root.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

use super::{reliability, QuizProgress, QuizStatus, RoleVector};

/// Optimistic-concurrency stamp for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileVersion(u64);

impl ProfileVersion {
    /// Create initial version (1)
    pub fn initial() -> Self {
        Self(1)
    }

    /// Create from a stored value
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Increment version
    pub fn increment(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Get inner value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ProfileVersion {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for ProfileVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-user behavioral profile built from quiz answers.
///
/// Exactly one per user. Reliability is never stored; it is derived from
/// status and progress on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicProfile {
    user_id: UserId,
    scores: RoleVector,
    quiz_status: QuizStatus,
    progress: QuizProgress,
    version: ProfileVersion,
    retake_count: u32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl CharacteristicProfile {
    /// Fresh profile: NOT_STARTED, all scores zero, version 1.
    pub fn new(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            scores: RoleVector::zero(),
            quiz_status: QuizStatus::NotStarted,
            progress: QuizProgress::default(),
            version: ProfileVersion::initial(),
            retake_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn scores(&self) -> &RoleVector {
        &self.scores
    }

    pub fn quiz_status(&self) -> QuizStatus {
        self.quiz_status
    }

    pub fn answered_questions(&self) -> u32 {
        self.progress.answered()
    }

    pub fn total_questions(&self) -> u32 {
        self.progress.total()
    }

    pub fn version(&self) -> ProfileVersion {
        self.version
    }

    pub fn retake_count(&self) -> u32 {
        self.retake_count
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Confidence weight in `[0, 1]` derived from status and progress.
    pub fn reliability(&self) -> f64 {
        reliability(self.quiz_status, self.progress)
    }

    /// Replaces scores and quiz state with a freshly scored submission.
    ///
    /// Bumps the version on every call. A submission arriving after a
    /// COMPLETED or SKIPPED attempt counts as a retake.
    pub fn apply_quiz_result(
        &mut self,
        scores: RoleVector,
        status: QuizStatus,
        progress: QuizProgress,
        now: Timestamp,
    ) {
        if self.quiz_status.is_terminal() && status != QuizStatus::NotStarted {
            self.retake_count += 1;
        }
        self.scores = scores;
        self.quiz_status = status;
        self.progress = progress;
        self.version = self.version.increment();
        self.updated_at = std::cmp::max(self.updated_at, now);
    }
}
