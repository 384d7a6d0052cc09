//! Application handlers.
//!
//! - `profile` - quiz submissions and profile creation (write side)
//! - `group` - lifecycle notifications from group management
//! - `matching` - recommendation queries (read side)

pub mod group;
pub mod matching;
pub mod profile;

pub use group::{
    GroupCreatedCommand, GroupCreatedHandler, GroupDeletedCommand, GroupDeletedHandler,
    MembershipChangedCommand, MembershipChangedHandler,
};
pub use matching::{
    GroupMatch, ListMatchesQuery, MatchingQueryService, QueryLimits, ScoreOneQuery,
};
pub use profile::{
    CreateCharacteristicProfileCommand, CreateCharacteristicProfileHandler,
    CreateCharacteristicProfileResult, SubmitQuizAnswersCommand, SubmitQuizAnswersHandler,
    SubmitQuizAnswersResult,
};
