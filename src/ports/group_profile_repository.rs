//! GroupProfileRepository port - derived group aggregate persistence.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, GroupId};
use crate::domain::group::GroupCharacteristicProfile;

/// Store for `GroupCharacteristicProfile`.
///
/// The aggregator is the only writer; query paths only read.
#[async_trait]
pub trait GroupProfileRepository: Send + Sync {
    async fn find(&self, group_id: GroupId)
        -> Result<Option<GroupCharacteristicProfile>, DomainError>;

    /// Load several group profiles. Groups without a profile are omitted.
    async fn find_many(
        &self,
        group_ids: &[GroupId],
    ) -> Result<Vec<GroupCharacteristicProfile>, DomainError>;

    /// Insert or replace.
    async fn save(&self, profile: &GroupCharacteristicProfile) -> Result<(), DomainError>;

    /// Insert only when no profile exists yet. Returns whether it was inserted.
    async fn insert_if_absent(
        &self,
        profile: &GroupCharacteristicProfile,
    ) -> Result<bool, DomainError>;

    /// Remove a group's profile. Missing profiles are not an error.
    async fn delete(&self, group_id: GroupId) -> Result<(), DomainError>;
}
