//! MatchingQueryService - read-side recommendation queries.
//!
//! `list_matches` enumerates groups in the user's enrolled courses, drops
//! anything failing a hard filter, and ranks the rest by score (descending,
//! ties by ascending group id). `score_one` runs the same filters for a
//! single pair and reports ineligibility as not-found rather than a score
//! of zero.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::domain::characteristic::CharacteristicProfile;
use crate::domain::foundation::{DomainError, ErrorCode, GroupId, Timestamp, UserId};
use crate::domain::group::{GroupCharacteristicProfile, GroupListing};
use crate::domain::matching::{
    check_eligibility, EligibilityContext, MatchBreakdown, MatchFilters, MatchScorer,
    ScoringError,
};
use crate::ports::{
    CharacteristicProfileRepository, EnrollmentReader, GroupDirectory, GroupProfileRepository,
};

#[derive(Debug, Clone)]
pub struct ListMatchesQuery {
    pub user_id: UserId,
    pub filters: MatchFilters,
}

#[derive(Debug, Clone)]
pub struct ScoreOneQuery {
    pub user_id: UserId,
    pub group_id: GroupId,
}

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMatch {
    pub group_id: GroupId,
    /// Final score in `[0, 100]`.
    pub score: f64,
    pub breakdown: MatchBreakdown,
}

/// Result limits applied when the query omits one.
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

pub struct MatchingQueryService {
    profiles: Arc<dyn CharacteristicProfileRepository>,
    group_profiles: Arc<dyn GroupProfileRepository>,
    directory: Arc<dyn GroupDirectory>,
    enrollments: Arc<dyn EnrollmentReader>,
    scorer: MatchScorer,
    limits: QueryLimits,
}

impl MatchingQueryService {
    pub fn new(
        profiles: Arc<dyn CharacteristicProfileRepository>,
        group_profiles: Arc<dyn GroupProfileRepository>,
        directory: Arc<dyn GroupDirectory>,
        enrollments: Arc<dyn EnrollmentReader>,
        scorer: MatchScorer,
        limits: QueryLimits,
    ) -> Self {
        Self {
            profiles,
            group_profiles,
            directory,
            enrollments,
            scorer,
            limits,
        }
    }

    pub async fn list_matches(&self, query: ListMatchesQuery) -> Result<Vec<GroupMatch>, DomainError> {
        // 1. Validate caller filters
        query.filters.validate(self.limits.max_limit)?;
        let limit = query.filters.limit.unwrap_or(self.limits.default_limit);

        // 2. Load the user and their eligibility facts
        let profile = self.load_profile(&query.user_id).await?;
        let context = self.eligibility_context(&query.user_id).await?;

        // 3. Hard filters
        let courses: Vec<_> = context.enrolled_courses.iter().cloned().collect();
        let candidates = self.directory.list_groups_in_courses(&courses).await?;
        let eligible: Vec<GroupListing> = candidates
            .into_iter()
            .filter(|group| match check_eligibility(group, &context, &query.filters) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::debug!(group_id = %group.group_id, %reason, "group filtered out");
                    false
                }
            })
            .collect();

        // 4. Score every survivor; one bad group never sinks the query
        let ids: Vec<GroupId> = eligible.iter().map(|g| g.group_id).collect();
        let group_profiles: HashMap<GroupId, GroupCharacteristicProfile> = self
            .group_profiles
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|p| (p.group_id(), p))
            .collect();

        let mut matches: Vec<GroupMatch> = ids
            .into_iter()
            .filter_map(|group_id| {
                let group_profile = group_profiles
                    .get(&group_id)
                    .cloned()
                    .unwrap_or_else(|| GroupCharacteristicProfile::empty(group_id, Timestamp::now()));
                score_guarded(&group_profile, |group| {
                    self.scorer.score_profiles(&profile, group)
                })
            })
            .collect();

        // 5. Rank deterministically
        matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.group_id.cmp(&b.group_id))
        });
        matches.truncate(limit);

        tracing::debug!(user_id = %query.user_id, results = matches.len(), "matches listed");
        Ok(matches)
    }

    pub async fn score_one(&self, query: ScoreOneQuery) -> Result<GroupMatch, DomainError> {
        let profile = self.load_profile(&query.user_id).await?;

        let group = self
            .directory
            .find_group(query.group_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::GroupNotFound,
                    format!("Group {} not found", query.group_id),
                )
                .with_detail("group_id", query.group_id.to_string())
            })?;

        let context = self.eligibility_context(&query.user_id).await?;
        if let Err(reason) = check_eligibility(&group, &context, &MatchFilters::default()) {
            return Err(DomainError::new(
                ErrorCode::GroupNotEligible,
                format!("Group {} is not eligible: {}", query.group_id, reason),
            )
            .with_detail("group_id", query.group_id.to_string())
            .with_detail("reason", reason.to_string()));
        }

        let group_profile = self
            .group_profiles
            .find(query.group_id)
            .await?
            .unwrap_or_else(|| GroupCharacteristicProfile::empty(query.group_id, Timestamp::now()));

        let breakdown = self
            .scorer
            .score_profiles(&profile, &group_profile)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;
        Ok(GroupMatch {
            group_id: query.group_id,
            score: breakdown.score,
            breakdown,
        })
    }

    async fn load_profile(&self, user_id: &UserId) -> Result<CharacteristicProfile, DomainError> {
        self.profiles.find_by_user(user_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::ProfileNotFound,
                format!("No characteristic profile for user {}", user_id),
            )
            .with_detail("user_id", user_id.to_string())
        })
    }

    async fn eligibility_context(&self, user_id: &UserId) -> Result<EligibilityContext, DomainError> {
        let courses = self.enrollments.enrolled_courses(user_id).await?;
        let memberships = self.directory.groups_for_user(user_id).await?;
        Ok(EligibilityContext::new(courses, memberships))
    }
}

/// Runs `score` for one group, turning an error or a panic into a skipped
/// group.
fn score_guarded<F>(group_profile: &GroupCharacteristicProfile, score: F) -> Option<GroupMatch>
where
    F: FnOnce(&GroupCharacteristicProfile) -> Result<MatchBreakdown, ScoringError>,
{
    let group_id = group_profile.group_id();
    let attempt = catch_unwind(AssertUnwindSafe(|| score(group_profile)));
    match attempt {
        Ok(Ok(breakdown)) => Some(GroupMatch {
            group_id,
            score: breakdown.score,
            breakdown,
        }),
        Ok(Err(error)) => {
            tracing::warn!(group_id = %group_id, error = %error, "group skipped during scoring");
            None
        }
        Err(_) => {
            tracing::warn!(group_id = %group_id, "scoring panicked, group skipped");
            None
        }
    }
}
