//! Reliability-weighted aggregation of member profiles.

use crate::domain::characteristic::{CharacteristicProfile, RoleVector};
use crate::domain::foundation::UserId;

/// One member's input to a group aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberContribution {
    pub user_id: UserId,
    pub scores: RoleVector,
    pub reliability: f64,
}

impl MemberContribution {
    pub fn from_profile(profile: &CharacteristicProfile) -> Self {
        Self {
            user_id: profile.user_id().clone(),
            scores: *profile.scores(),
            reliability: profile.reliability(),
        }
    }

    fn contributes(&self) -> bool {
        self.reliability.is_finite() && self.reliability > 0.0
    }
}

/// Output of `aggregate_members`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateScores {
    pub average_scores: RoleVector,
    pub member_count_contributing: u32,
}

/// Weighted mean per role: `Σ(score·reliability) / Σ(reliability)` over
/// members with reliability > 0, or the zero vector when nobody contributes.
///
/// Members are summed in user-id order so the floating-point result does not
/// depend on the order the caller supplies them in.
pub fn aggregate_members(members: &[MemberContribution]) -> AggregateScores {
    let mut contributing: Vec<&MemberContribution> =
        members.iter().filter(|m| m.contributes()).collect();
    contributing.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    let denominator: f64 = contributing.iter().map(|m| m.reliability).sum();
    if contributing.is_empty() || denominator <= 0.0 {
        return AggregateScores {
            average_scores: RoleVector::zero(),
            member_count_contributing: 0,
        };
    }

    // Normalized weights sum to 1, so every partial sum stays in [0, 1].
    let mut average_scores = RoleVector::zero();
    for member in &contributing {
        average_scores.scaled_add(&member.scores, member.reliability / denominator);
    }

    AggregateScores {
        average_scores,
        member_count_contributing: u32::try_from(contributing.len()).unwrap_or(u32::MAX),
    }
}
