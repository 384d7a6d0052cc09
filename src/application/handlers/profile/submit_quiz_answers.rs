//! SubmitQuizAnswersHandler - scores answers and writes them to the profile.

use std::sync::Arc;

use crate::domain::characteristic::{CharacteristicProfile, CharacteristicProfileUpdated};
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, EventId, Timestamp, UserId};
use crate::domain::quiz::{validate_answers, QuizAnswer, QuizOutcome, QuizScoringAdapter};
use crate::ports::{CharacteristicProfileRepository, EventPublisher};

/// Command to submit a (possibly partial) set of quiz answers.
#[derive(Debug, Clone)]
pub struct SubmitQuizAnswersCommand {
    pub user_id: UserId,
    pub answers: Vec<QuizAnswer>,
}

#[derive(Debug, Clone)]
pub struct SubmitQuizAnswersResult {
    pub profile: CharacteristicProfile,
    pub outcome: QuizOutcome,
    /// Write attempts used, 1 when no conflict occurred.
    pub attempts: u32,
}

/// Handler for quiz submissions.
///
/// The write is a read-modify-write on a version-stamped record: on a
/// version conflict the profile is reloaded and the outcome reapplied, up to
/// `max_retries` times.
pub struct SubmitQuizAnswersHandler {
    profiles: Arc<dyn CharacteristicProfileRepository>,
    scoring: Arc<QuizScoringAdapter>,
    event_publisher: Arc<dyn EventPublisher>,
    max_retries: u32,
}

impl SubmitQuizAnswersHandler {
    pub fn new(
        profiles: Arc<dyn CharacteristicProfileRepository>,
        scoring: Arc<QuizScoringAdapter>,
        event_publisher: Arc<dyn EventPublisher>,
        max_retries: u32,
    ) -> Self {
        Self {
            profiles,
            scoring,
            event_publisher,
            max_retries,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitQuizAnswersCommand,
    ) -> Result<SubmitQuizAnswersResult, DomainError> {
        // 1. Reject malformed input before touching storage
        validate_answers(&cmd.answers)?;

        // 2. Score (pure)
        let outcome = self.scoring.score(&cmd.answers);

        // 3. Write with compare-and-swap, retrying on conflicts
        let (profile, attempts) = self.write_with_retry(&cmd.user_id, &outcome).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            version = profile.version().as_u64(),
            status = ?profile.quiz_status(),
            attempts,
            "quiz answers recorded"
        );

        // 4. Publish; the write already committed, so a failure is only logged
        let event = CharacteristicProfileUpdated {
            event_id: EventId::new(),
            user_id: cmd.user_id.clone(),
            version: profile.version().as_u64(),
            quiz_status: profile.quiz_status(),
            updated_at: profile.updated_at(),
        };
        if let Err(error) = self.publish(&event).await {
            tracing::warn!(
                user_id = %cmd.user_id,
                error = %error,
                "profile written but update event not published"
            );
        }

        Ok(SubmitQuizAnswersResult {
            profile,
            outcome,
            attempts,
        })
    }

    async fn write_with_retry(
        &self,
        user_id: &UserId,
        outcome: &QuizOutcome,
    ) -> Result<(CharacteristicProfile, u32), DomainError> {
        let max_attempts = self.max_retries.saturating_add(1);

        for attempt in 1..=max_attempts {
            let result = match self.profiles.find_by_user(user_id).await? {
                Some(mut profile) => {
                    let expected = profile.version();
                    apply(&mut profile, outcome);
                    self.profiles
                        .compare_and_swap(&profile, expected)
                        .await
                        .map(|()| profile)
                }
                None => {
                    // First quiz launch creates the profile.
                    let mut profile = CharacteristicProfile::new(user_id.clone(), Timestamp::now());
                    apply(&mut profile, outcome);
                    self.profiles.create(&profile).await.map(|()| profile)
                }
            };

            match result {
                Ok(profile) => return Ok((profile, attempt)),
                Err(error) if error.code == ErrorCode::ConcurrencyConflict => {
                    tracing::warn!(
                        user_id = %user_id,
                        attempt,
                        max_attempts,
                        "profile version conflict, reloading"
                    );
                }
                Err(error) => return Err(error),
            }
        }

        Err(DomainError::new(
            ErrorCode::RetryBudgetExhausted,
            format!(
                "Profile for user {} kept changing; gave up after {} attempts",
                user_id, max_attempts
            ),
        )
        .with_detail("user_id", user_id.to_string()))
    }

    async fn publish(&self, event: &CharacteristicProfileUpdated) -> Result<(), DomainError> {
        let envelope = EventEnvelope::from_event(event)?.with_user_id(event.user_id.to_string());
        self.event_publisher.publish(envelope).await
    }
}

fn apply(profile: &mut CharacteristicProfile, outcome: &QuizOutcome) {
    profile.apply_quiz_result(outcome.scores, outcome.status, outcome.progress, Timestamp::now());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryCharacteristicProfileStore, InMemoryEventBus};
    use crate::domain::characteristic::{ProfileVersion, QuizStatus, Role};
    use crate::domain::quiz::AnswerKey;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn key() -> Arc<AnswerKey> {
        Arc::new(
            AnswerKey::new()
                .with_option("q1", "a", [(Role::Leader, 0.6)])
                .with_option("q1", "b", [(Role::Creative, 0.6)])
                .with_option("q2", "a", [(Role::Leader, 0.6)])
                .with_option("q2", "b", [(Role::Planner, 0.5)]),
        )
    }

    fn user() -> UserId {
        UserId::new("student-7").unwrap()
    }

    fn handler_with(
        profiles: Arc<dyn CharacteristicProfileRepository>,
        bus: Arc<InMemoryEventBus>,
        max_retries: u32,
    ) -> SubmitQuizAnswersHandler {
        SubmitQuizAnswersHandler::new(
            profiles,
            Arc::new(QuizScoringAdapter::new(key())),
            bus,
            max_retries,
        )
    }

    fn cmd(answers: Vec<QuizAnswer>) -> SubmitQuizAnswersCommand {
        SubmitQuizAnswersCommand {
            user_id: user(),
            answers,
        }
    }

    /// Store that reports a version conflict for the first `conflicts` CAS calls.
    struct ConflictingStore {
        inner: InMemoryCharacteristicProfileStore,
        conflicts: AtomicU32,
    }

    #[async_trait]
    impl CharacteristicProfileRepository for ConflictingStore {
        async fn find_by_user(
            &self,
            user_id: &UserId,
        ) -> Result<Option<CharacteristicProfile>, DomainError> {
            self.inner.find_by_user(user_id).await
        }

        async fn find_many(
            &self,
            user_ids: &[UserId],
        ) -> Result<Vec<CharacteristicProfile>, DomainError> {
            self.inner.find_many(user_ids).await
        }

        async fn create(&self, profile: &CharacteristicProfile) -> Result<(), DomainError> {
            self.inner.create(profile).await
        }

        async fn compare_and_swap(
            &self,
            profile: &CharacteristicProfile,
            expected_version: ProfileVersion,
        ) -> Result<(), DomainError> {
            let remaining = self.conflicts.load(Ordering::SeqCst);
            if remaining > 0 {
                self.conflicts.store(remaining - 1, Ordering::SeqCst);
                return Err(DomainError::new(ErrorCode::ConcurrencyConflict, "raced"));
            }
            self.inner.compare_and_swap(profile, expected_version).await
        }
    }

    async fn conflicting_store(conflicts: u32) -> Arc<ConflictingStore> {
        let inner = InMemoryCharacteristicProfileStore::new();
        inner
            .create(&CharacteristicProfile::new(user(), Timestamp::now()))
            .await
            .unwrap();
        Arc::new(ConflictingStore {
            inner,
            conflicts: AtomicU32::new(conflicts),
        })
    }

    #[tokio::test]
    async fn first_submission_creates_profile_and_publishes() {
        let store = Arc::new(InMemoryCharacteristicProfileStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(store.clone(), bus.clone(), 3);

        let result = handler
            .handle(cmd(vec![QuizAnswer::new("q1", "a")]))
            .await
            .unwrap();

        assert_eq!(result.profile.quiz_status(), QuizStatus::InProgress);
        assert_eq!(result.profile.reliability(), 0.5);
        assert_eq!(result.attempts, 1);
        assert!(store.find_by_user(&user()).await.unwrap().is_some());

        let events = bus.events_of_type(CharacteristicProfileUpdated::EVENT_TYPE);
        assert_eq!(events.len(), 1);
        let payload: CharacteristicProfileUpdated = events[0].payload_as().unwrap();
        assert_eq!(payload.user_id, user());
        assert_eq!(payload.version, result.profile.version().as_u64());
    }

    #[tokio::test]
    async fn every_submission_bumps_version() {
        let store = Arc::new(InMemoryCharacteristicProfileStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(store.clone(), bus, 3);

        handler.handle(cmd(vec![QuizAnswer::new("q1", "a")])).await.unwrap();
        let second = handler
            .handle(cmd(vec![QuizAnswer::new("q1", "a"), QuizAnswer::new("q2", "b")]))
            .await
            .unwrap();

        assert_eq!(second.profile.version().as_u64(), 3);
        assert_eq!(second.profile.quiz_status(), QuizStatus::Completed);
        assert_eq!(second.profile.retake_count(), 0);
    }

    #[tokio::test]
    async fn resubmission_after_completion_counts_as_retake() {
        let store = Arc::new(InMemoryCharacteristicProfileStore::new());
        let handler = handler_with(store, Arc::new(InMemoryEventBus::new()), 3);
        let full = vec![QuizAnswer::new("q1", "a"), QuizAnswer::new("q2", "a")];

        handler.handle(cmd(full.clone())).await.unwrap();
        let retake = handler.handle(cmd(full)).await.unwrap();

        assert_eq!(retake.profile.retake_count(), 1);
        // 0.6 + 0.6 clamps to 1.0
        assert_eq!(retake.profile.scores().get(Role::Leader), 1.0);
    }

    #[tokio::test]
    async fn empty_submission_marks_quiz_skipped() {
        let store = Arc::new(InMemoryCharacteristicProfileStore::new());
        let handler = handler_with(store, Arc::new(InMemoryEventBus::new()), 3);

        let result = handler.handle(cmd(vec![])).await.unwrap();

        assert_eq!(result.profile.quiz_status(), QuizStatus::Skipped);
        assert_eq!(result.profile.reliability(), 0.0);
        assert!(result.profile.scores().is_zero());
    }

    #[tokio::test]
    async fn duplicate_questions_are_rejected_without_writing() {
        let store = Arc::new(InMemoryCharacteristicProfileStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(store.clone(), bus.clone(), 3);

        let err = handler
            .handle(cmd(vec![QuizAnswer::new("q1", "a"), QuizAnswer::new("q1", "b")]))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(store.is_empty().await);
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn version_conflicts_are_retried() {
        let store = conflicting_store(2).await;
        let handler = handler_with(store.clone(), Arc::new(InMemoryEventBus::new()), 3);

        let result = handler
            .handle(cmd(vec![QuizAnswer::new("q1", "b")]))
            .await
            .unwrap();

        assert_eq!(result.attempts, 3);
        assert_eq!(result.profile.version().as_u64(), 2);
        let stored = store.find_by_user(&user()).await.unwrap().unwrap();
        assert_eq!(stored.scores().get(Role::Creative), 0.6);
    }

    #[tokio::test]
    async fn exhausted_retry_budget_is_transient_error() {
        let store = conflicting_store(10).await;
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(store, bus.clone(), 2);

        let err = handler
            .handle(cmd(vec![QuizAnswer::new("q1", "b")]))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::RetryBudgetExhausted);
        assert!(err.is_transient());
        assert_eq!(bus.event_count(), 0);
    }
}
