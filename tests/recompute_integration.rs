//! Integration tests for event-driven group profile recomputation.
//!
//! These tests verify the end-to-end flow:
//! 1. Command handlers write profiles and publish events on the bus
//! 2. RecomputeEventHandler forwards events to the dispatcher
//! 3. The dispatcher coalesces and runs ProfileAggregator jobs
//! 4. Group profiles reflect the latest member state
//!
//! Uses in-memory adapters only.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

use study_match::adapters::{
    InMemoryCharacteristicProfileStore, InMemoryEventBus, InMemoryGroupDirectory,
    InMemoryGroupProfileStore,
};
use study_match::application::{
    GroupCreatedCommand, GroupCreatedHandler, GroupDeletedCommand, GroupDeletedHandler,
    GroupRecomputer, MembershipChangedCommand, MembershipChangedHandler, ProfileAggregator,
    RecomputeDispatcher, RecomputeEventHandler, SubmitQuizAnswersCommand,
    SubmitQuizAnswersHandler,
};
use study_match::domain::characteristic::{QuizStatus, Role};
use study_match::domain::foundation::{CourseId, DomainError, ErrorCode, GroupId, UserId};
use study_match::domain::group::{
    Availability, GroupCharacteristicProfile, GroupListing, GroupVisibility, MembershipChange,
};
use study_match::domain::quiz::{AnswerKey, QuizAnswer, QuizScoringAdapter};
use study_match::ports::GroupProfileRepository;

const WAIT: Duration = Duration::from_secs(5);

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Two-question key: q1 sets LEADER, q2 carries no weight.
fn answer_key() -> AnswerKey {
    AnswerKey::new()
        .with_option("q1", "lead9", [(Role::Leader, 0.9)])
        .with_option("q1", "lead8", [(Role::Leader, 0.8)])
        .with_option("q1", "split", [(Role::Leader, 0.5), (Role::Planner, 0.5)])
        .with_option("q1", "plan", [(Role::Planner, 1.0)])
        .with_option("q2", "pass", Vec::<(Role, f64)>::new())
}

/// Wraps the real aggregator; the first recompute blocks until released.
struct GatedRecomputer {
    inner: ProfileAggregator,
    gate: Semaphore,
    gated_runs: AtomicUsize,
    started: mpsc::UnboundedSender<GroupId>,
    runs: AtomicUsize,
}

#[async_trait]
impl GroupRecomputer for GatedRecomputer {
    async fn recompute(
        &self,
        group_id: GroupId,
    ) -> Result<Option<GroupCharacteristicProfile>, DomainError> {
        let _ = self.started.send(group_id);
        let gated = self
            .gated_runs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if gated {
            self.gate.acquire().await.unwrap().forget();
        }
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.inner.recompute(group_id).await
    }

    async fn seed_from_creator(
        &self,
        group_id: GroupId,
        creator_id: &UserId,
    ) -> Result<Option<GroupCharacteristicProfile>, DomainError> {
        self.inner.seed_from_creator(group_id, creator_id).await
    }

    async fn discard(&self, group_id: GroupId) -> Result<(), DomainError> {
        self.inner.discard(group_id).await
    }
}

struct TestApp {
    directory: InMemoryGroupDirectory,
    group_profiles: InMemoryGroupProfileStore,
    dispatcher: RecomputeDispatcher,
    submit: SubmitQuizAnswersHandler,
    group_created: GroupCreatedHandler,
    membership_changed: MembershipChangedHandler,
    group_deleted: GroupDeletedHandler,
}

impl TestApp {
    fn new() -> Self {
        Self::with_gate(0).0
    }

    /// Builds the app with the first `gated_runs` recomputes held until
    /// the returned recomputer's gate is released.
    fn with_gate(
        gated_runs: usize,
    ) -> (Self, Arc<GatedRecomputer>, mpsc::UnboundedReceiver<GroupId>) {
        let bus = Arc::new(InMemoryEventBus::new());
        let profiles = InMemoryCharacteristicProfileStore::new();
        let group_profiles = InMemoryGroupProfileStore::new();
        let directory = InMemoryGroupDirectory::new();

        let (started, started_rx) = mpsc::unbounded_channel();
        let recomputer = Arc::new(GatedRecomputer {
            inner: ProfileAggregator::new(
                Arc::new(directory.clone()),
                Arc::new(profiles.clone()),
                Arc::new(group_profiles.clone()),
            ),
            gate: Semaphore::new(0),
            gated_runs: AtomicUsize::new(gated_runs),
            started,
            runs: AtomicUsize::new(0),
        });
        let dispatcher =
            RecomputeDispatcher::start(recomputer.clone(), Arc::new(directory.clone()), 4);
        RecomputeEventHandler::register(bus.as_ref(), dispatcher.clone());

        let scoring = Arc::new(QuizScoringAdapter::new(Arc::new(answer_key())));
        let app = Self {
            submit: SubmitQuizAnswersHandler::new(Arc::new(profiles), scoring, bus.clone(), 3),
            group_created: GroupCreatedHandler::new(bus.clone()),
            membership_changed: MembershipChangedHandler::new(bus.clone()),
            group_deleted: GroupDeletedHandler::new(bus),
            directory,
            group_profiles,
            dispatcher,
        };
        (app, recomputer, started_rx)
    }

    async fn add_group(&self) -> GroupId {
        let listing = GroupListing::new(
            GroupId::new(),
            CourseId::new("CS101").unwrap(),
            30,
            GroupVisibility::Public,
            Availability::Flexible,
        )
        .unwrap();
        let id = listing.group_id;
        self.directory.add_group(listing).await;
        id
    }

    async fn submit(&self, user: &str, answers: &[(&str, &str)]) -> QuizStatus {
        let result = self
            .submit
            .handle(SubmitQuizAnswersCommand {
                user_id: user_id(user),
                answers: answers
                    .iter()
                    .map(|(q, o)| QuizAnswer::new(*q, *o))
                    .collect(),
            })
            .await
            .unwrap();
        result.profile.quiz_status()
    }

    async fn join(&self, group_id: GroupId, user: &str) {
        self.directory.add_member(group_id, user_id(user)).await.unwrap();
        self.membership_changed
            .handle(MembershipChangedCommand {
                group_id,
                user_id: Some(user_id(user)),
                change: MembershipChange::Joined,
            })
            .await
            .unwrap();
    }

    async fn settle(&self) {
        tokio::time::timeout(WAIT, self.dispatcher.wait_idle())
            .await
            .expect("dispatcher did not go idle");
    }

    async fn group_profile(&self, group_id: GroupId) -> Option<GroupCharacteristicProfile> {
        self.group_profiles.find(group_id).await.unwrap()
    }
}

fn user_id(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn reliability_weighted_average_flows_end_to_end() {
    let app = TestApp::new();
    let group = app.add_group().await;
    app.join(group, "a").await;
    app.join(group, "b").await;

    assert_eq!(app.submit("a", &[("q1", "lead9"), ("q2", "pass")]).await, QuizStatus::Completed);
    assert_eq!(app.submit("b", &[("q1", "lead8")]).await, QuizStatus::InProgress);
    app.settle().await;

    let profile = app.group_profile(group).await.unwrap();
    let expected = (0.9 * 1.0 + 0.8 * 0.5) / 1.5;
    assert!((profile.average_scores().get(Role::Leader) - expected).abs() < 1e-9);
    assert_eq!(profile.member_count_contributing(), 2);
    for role in Role::ALL {
        if role != Role::Leader {
            assert_eq!(profile.average_scores().get(role), 0.0);
        }
    }
}

#[tokio::test]
async fn group_creation_seeds_from_creator_immediately() {
    let app = TestApp::new();
    app.submit("creator", &[("q1", "split"), ("q2", "pass")]).await;
    let group = app.add_group().await;
    app.directory.add_member(group, user_id("creator")).await.unwrap();

    app.group_created
        .handle(GroupCreatedCommand {
            group_id: group,
            creator_id: user_id("creator"),
        })
        .await
        .unwrap();

    // Seeded synchronously during event delivery, before any recompute ran.
    let seeded = app.group_profile(group).await.unwrap();
    assert_eq!(
        seeded.average_scores().components(),
        &[0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0]
    );
    assert_eq!(seeded.member_count_contributing(), 1);

    app.settle().await;
    let settled = app.group_profile(group).await.unwrap();
    assert_eq!(settled.average_scores(), seeded.average_scores());
}

#[tokio::test]
async fn creator_seed_survives_until_first_join() {
    let app = TestApp::new();
    app.submit("creator", &[("q1", "split"), ("q2", "pass")]).await;
    let group = app.add_group().await;

    // The directory does not list the creator until their join event.
    app.group_created
        .handle(GroupCreatedCommand {
            group_id: group,
            creator_id: user_id("creator"),
        })
        .await
        .unwrap();
    app.settle().await;

    let before_join = app.group_profile(group).await.unwrap();
    assert_eq!(
        before_join.average_scores().components(),
        &[0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0]
    );
    assert_eq!(before_join.member_count_contributing(), 1);

    app.join(group, "creator").await;
    app.settle().await;

    let after_join = app.group_profile(group).await.unwrap();
    assert_eq!(after_join.average_scores(), before_join.average_scores());
    assert_eq!(after_join.member_count_contributing(), 1);
}

#[tokio::test]
async fn profile_update_fans_out_to_every_group() {
    let app = TestApp::new();
    let first = app.add_group().await;
    let second = app.add_group().await;
    let unrelated = app.add_group().await;
    app.join(first, "a").await;
    app.join(second, "a").await;
    app.settle().await;

    app.submit("a", &[("q1", "plan"), ("q2", "pass")]).await;
    app.settle().await;

    for group in [first, second] {
        let profile = app.group_profile(group).await.unwrap();
        assert_eq!(profile.average_scores().get(Role::Planner), 1.0);
    }
    assert!(app.group_profile(unrelated).await.is_none());
}

#[tokio::test]
async fn burst_of_events_coalesces_into_two_runs() {
    let (app, recomputer, mut started) = TestApp::with_gate(1);
    let group = app.add_group().await;
    app.submit("a", &[("q1", "lead9"), ("q2", "pass")]).await;

    app.join(group, "a").await;
    tokio::time::timeout(WAIT, started.recv()).await.unwrap();

    // The first run is parked; every further event lands on the running slot.
    for i in 0..9 {
        let user = format!("late-{i}");
        app.submit(&user, &[("q1", "plan"), ("q2", "pass")]).await;
        app.join(group, &user).await;
    }
    recomputer.gate.add_permits(1);
    app.settle().await;

    assert_eq!(recomputer.runs.load(Ordering::SeqCst), 2);
    let profile = app.group_profile(group).await.unwrap();
    assert_eq!(profile.member_count_contributing(), 10);
    let expected_planner = 9.0 / 10.0;
    assert!((profile.average_scores().get(Role::Planner) - expected_planner).abs() < 1e-9);

    let stats = app.dispatcher.stats();
    assert_eq!(stats.scheduled, 1);
    assert!(stats.coalesced >= 9);
    assert_eq!(stats.pending_groups, 0);
}

#[tokio::test]
async fn retake_updates_group_profile() {
    let app = TestApp::new();
    let group = app.add_group().await;
    app.join(group, "a").await;
    app.submit("a", &[("q1", "lead9"), ("q2", "pass")]).await;
    app.settle().await;

    app.submit("a", &[("q1", "plan"), ("q2", "pass")]).await;
    app.settle().await;

    let profile = app.group_profile(group).await.unwrap();
    assert_eq!(profile.average_scores().get(Role::Leader), 0.0);
    assert_eq!(profile.average_scores().get(Role::Planner), 1.0);
}

#[tokio::test]
async fn skipped_quiz_contributes_nothing() {
    let app = TestApp::new();
    let group = app.add_group().await;
    app.join(group, "a").await;
    app.join(group, "skipper").await;
    app.submit("a", &[("q1", "lead9"), ("q2", "pass")]).await;
    assert_eq!(app.submit("skipper", &[]).await, QuizStatus::Skipped);
    app.settle().await;

    let profile = app.group_profile(group).await.unwrap();
    assert_eq!(profile.member_count_contributing(), 1);
    assert!((profile.average_scores().get(Role::Leader) - 0.9).abs() < 1e-12);
}

#[tokio::test]
async fn deleting_group_removes_its_profile() {
    let app = TestApp::new();
    let group = app.add_group().await;
    app.join(group, "a").await;
    app.settle().await;
    assert!(app.group_profile(group).await.is_some());

    app.directory.remove_group(group).await;
    app.group_deleted
        .handle(GroupDeletedCommand { group_id: group })
        .await
        .unwrap();
    app.settle().await;

    assert!(app.group_profile(group).await.is_none());
}

#[tokio::test]
async fn shutdown_drains_then_rejects() {
    let app = TestApp::new();
    let group = app.add_group().await;
    app.submit("a", &[("q1", "lead9"), ("q2", "pass")]).await;
    app.join(group, "a").await;

    app.dispatcher.shutdown(WAIT).await.unwrap();

    assert!(app.group_profile(group).await.is_some());
    assert!(app.dispatcher.is_closed());
    let err = app.dispatcher.enqueue(group).unwrap_err();
    assert_eq!(err.code, ErrorCode::DispatcherClosed);
}
