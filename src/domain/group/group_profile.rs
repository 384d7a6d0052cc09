//! Derived aggregate profile of a study group.

use serde::{Deserialize, Serialize};

use crate::domain::characteristic::RoleVector;
use crate::domain::foundation::{GroupId, Timestamp};

/// Reliability-weighted mean of the members' role scores.
///
/// Derived state only: the recompute path is its single writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCharacteristicProfile {
    group_id: GroupId,
    average_scores: RoleVector,
    member_count_contributing: u32,
    last_recomputed_at: Timestamp,
}

impl GroupCharacteristicProfile {
    /// Builds a profile; a zero contributor count forces the zero vector.
    pub fn new(
        group_id: GroupId,
        average_scores: RoleVector,
        member_count_contributing: u32,
        last_recomputed_at: Timestamp,
    ) -> Self {
        let average_scores = if member_count_contributing == 0 {
            RoleVector::zero()
        } else {
            average_scores
        };
        Self {
            group_id,
            average_scores,
            member_count_contributing,
            last_recomputed_at,
        }
    }

    /// Profile of a group nobody has contributed to yet.
    pub fn empty(group_id: GroupId, at: Timestamp) -> Self {
        Self::new(group_id, RoleVector::zero(), 0, at)
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn average_scores(&self) -> &RoleVector {
        &self.average_scores
    }

    pub fn member_count_contributing(&self) -> u32 {
        self.member_count_contributing
    }

    pub fn last_recomputed_at(&self) -> Timestamp {
        self.last_recomputed_at
    }
}
