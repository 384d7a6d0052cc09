//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write profiles and publish events; the recompute module
//! reacts to those events; the matching service reads the results.

pub mod handlers;
pub mod recompute;

pub use handlers::{
    // Profile commands
    CreateCharacteristicProfileCommand, CreateCharacteristicProfileHandler,
    CreateCharacteristicProfileResult, SubmitQuizAnswersCommand, SubmitQuizAnswersHandler,
    SubmitQuizAnswersResult,
    // Group lifecycle
    GroupCreatedCommand, GroupCreatedHandler, GroupDeletedCommand, GroupDeletedHandler,
    MembershipChangedCommand, MembershipChangedHandler,
    // Matching queries
    GroupMatch, ListMatchesQuery, MatchingQueryService, QueryLimits, ScoreOneQuery,
};
pub use recompute::{
    DispatcherStats, EnqueueOutcome, GroupRecomputer, ProfileAggregator, RecomputeDispatcher,
    RecomputeEventHandler, RECOMPUTE_EVENT_TYPES,
};
