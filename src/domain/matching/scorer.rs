//! Variance-reduction compatibility scoring.
//!
//! A candidate scores well when adding them to a group flattens the group's
//! role coverage: a team heavy on one role gains more from someone who fills
//! the gaps than from another copy of its strongest role.

use thiserror::Error;

use crate::domain::characteristic::{CharacteristicProfile, Role, RoleVector};
use crate::domain::foundation::ValidationError;
use crate::domain::group::GroupCharacteristicProfile;

/// Reductions closer to zero than this are treated as exactly zero.
const REDUCTION_EPSILON: f64 = 1e-12;

/// Upper bound on a reported score.
pub const MAX_SCORE: f64 = 100.0;

/// Calibration for score normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerConfig {
    /// Variance of the reference "all-or-nothing" vector. The per-size
    /// ceiling is derived from it.
    pub ceiling_variance: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            ceiling_variance: RoleVector::one_hot(Role::Leader).population_variance(),
        }
    }
}

impl ScorerConfig {
    /// Overrides the reference variance; must be finite and positive.
    pub fn with_ceiling_variance(ceiling_variance: f64) -> Result<Self, ValidationError> {
        if !ceiling_variance.is_finite() || ceiling_variance <= 0.0 {
            return Err(ValidationError::invalid_format(
                "ceiling_variance",
                format!("must be finite and > 0, got {}", ceiling_variance),
            ));
        }
        Ok(Self { ceiling_variance })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("non-finite {what} in scoring input")]
    NonFinite { what: &'static str },
}

/// Every intermediate of one (user, group) scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchBreakdown {
    /// `match_score * reliability`, in `[0, 100]`.
    pub score: f64,
    /// Normalized reduction before the reliability dampener, in `[0, 100]`.
    pub match_score: f64,
    pub var_before: f64,
    pub var_after: f64,
    /// `max(var_before - var_after, 0)`.
    pub reduction: f64,
    /// Largest reduction the normalization expects for this group size.
    pub ceiling: f64,
    pub reliability: f64,
}

/// Scores a candidate profile against a group aggregate.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    config: ScorerConfig,
}

impl MatchScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// `ceiling_variance * (1 - (n / (n + 1))^2)`.
    ///
    /// This is the reduction obtained when a perfectly flat candidate joins a
    /// group whose variance equals the reference variance.
    pub fn ceiling_for(&self, n: u32) -> f64 {
        let n = f64::from(n);
        let retained = n / (n + 1.0);
        self.config.ceiling_variance * (1.0 - retained * retained)
    }

    /// Scores candidate `profile` (with its `reliability`) against group
    /// average `group` with `n` contributing members.
    pub fn score(
        &self,
        profile: &RoleVector,
        reliability: f64,
        group: &RoleVector,
        n: u32,
    ) -> Result<MatchBreakdown, ScoringError> {
        if !reliability.is_finite() {
            return Err(ScoringError::NonFinite { what: "reliability" });
        }
        let reliability = reliability.clamp(0.0, 1.0);

        let var_before = if n == 0 { 0.0 } else { group.population_variance() };
        let var_after = group.blend_one_more(n, profile).population_variance();
        if !var_before.is_finite() || !var_after.is_finite() {
            return Err(ScoringError::NonFinite { what: "variance" });
        }

        let mut reduction = (var_before - var_after).max(0.0);
        if reduction < REDUCTION_EPSILON {
            reduction = 0.0;
        }

        let ceiling = self.ceiling_for(n);
        let match_score = if ceiling > 0.0 {
            (MAX_SCORE * reduction / ceiling).min(MAX_SCORE)
        } else {
            0.0
        };

        Ok(MatchBreakdown {
            score: match_score * reliability,
            match_score,
            var_before,
            var_after,
            reduction,
            ceiling,
            reliability,
        })
    }

    /// Convenience wrapper over the stored profile types.
    pub fn score_profiles(
        &self,
        user: &CharacteristicProfile,
        group: &GroupCharacteristicProfile,
    ) -> Result<MatchBreakdown, ScoringError> {
        self.score(
            user.scores(),
            user.reliability(),
            group.average_scores(),
            group.member_count_contributing(),
        )
    }
}
