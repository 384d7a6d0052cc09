//! Matching module - pure domain services for group recommendation.
//!
//! - `aggregation` - reliability-weighted group averages
//! - `scorer` - variance-reduction compatibility score
//! - `eligibility` - hard filters applied before scoring

mod aggregation;
mod eligibility;
mod scorer;

pub use aggregation::{aggregate_members, AggregateScores, MemberContribution};
pub use eligibility::{
    check_eligibility, EligibilityContext, Ineligibility, MatchFilters, RawMatchFilters,
};
pub use scorer::{MatchBreakdown, MatchScorer, ScorerConfig, ScoringError, MAX_SCORE};
