//! Matching queries.

mod query_service;

pub use query_service::{
    GroupMatch, ListMatchesQuery, MatchingQueryService, QueryLimits, ScoreOneQuery,
};
