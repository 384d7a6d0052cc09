//! ProfileAggregator - rebuilds a group's derived profile from its members.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, GroupId, Timestamp, UserId};
use crate::domain::group::GroupCharacteristicProfile;
use crate::domain::matching::{aggregate_members, MemberContribution};
use crate::ports::{CharacteristicProfileRepository, GroupDirectory, GroupProfileRepository};

/// Writer of `GroupCharacteristicProfile`, driven by the recompute dispatcher.
///
/// `Ok(None)` means the group no longer exists; callers treat it as a no-op.
#[async_trait]
pub trait GroupRecomputer: Send + Sync {
    /// Recompute the group's profile from current membership.
    async fn recompute(
        &self,
        group_id: GroupId,
    ) -> Result<Option<GroupCharacteristicProfile>, DomainError>;

    /// Seed a new group's profile from its creator. Leaves an existing
    /// profile untouched and returns it.
    async fn seed_from_creator(
        &self,
        group_id: GroupId,
        creator_id: &UserId,
    ) -> Result<Option<GroupCharacteristicProfile>, DomainError>;

    /// Drop the profile of a deleted group.
    async fn discard(&self, group_id: GroupId) -> Result<(), DomainError>;
}

pub struct ProfileAggregator {
    directory: Arc<dyn GroupDirectory>,
    profiles: Arc<dyn CharacteristicProfileRepository>,
    group_profiles: Arc<dyn GroupProfileRepository>,
}

impl ProfileAggregator {
    pub fn new(
        directory: Arc<dyn GroupDirectory>,
        profiles: Arc<dyn CharacteristicProfileRepository>,
        group_profiles: Arc<dyn GroupProfileRepository>,
    ) -> Self {
        Self {
            directory,
            profiles,
            group_profiles,
        }
    }

    async fn contributions(&self, members: &[UserId]) -> Result<Vec<MemberContribution>, DomainError> {
        Ok(self
            .profiles
            .find_many(members)
            .await?
            .iter()
            .map(MemberContribution::from_profile)
            .collect())
    }

    async fn recompute_timestamp(&self, group_id: GroupId) -> Result<Timestamp, DomainError> {
        let previous = self.group_profiles.find(group_id).await?;
        Ok(match previous {
            Some(p) => Timestamp::now_at_least(p.last_recomputed_at()),
            None => Timestamp::now(),
        })
    }
}

#[async_trait]
impl GroupRecomputer for ProfileAggregator {
    async fn recompute(
        &self,
        group_id: GroupId,
    ) -> Result<Option<GroupCharacteristicProfile>, DomainError> {
        // 1. Resolve membership; a vanished group is a stale reference
        let Some(members) = self.directory.list_members(group_id).await? else {
            tracing::debug!(group_id = %group_id, "recompute for unknown group skipped");
            return Ok(None);
        };

        // 2. Aggregate. Members without a stored profile contribute nothing.
        let contributions = self.contributions(&members).await?;
        let aggregate = aggregate_members(&contributions);

        // 3. Persist with a non-decreasing timestamp
        let at = self.recompute_timestamp(group_id).await?;
        let profile = GroupCharacteristicProfile::new(
            group_id,
            aggregate.average_scores,
            aggregate.member_count_contributing,
            at,
        );
        self.group_profiles.save(&profile).await?;

        // 4. A deletion that raced the write must not leave a profile behind
        if self.directory.find_group(group_id).await?.is_none() {
            tracing::debug!(group_id = %group_id, "group deleted during recompute");
            self.group_profiles.delete(group_id).await?;
            return Ok(None);
        }

        tracing::debug!(
            group_id = %group_id,
            members = members.len(),
            contributing = profile.member_count_contributing(),
            "group profile recomputed"
        );
        Ok(Some(profile))
    }

    async fn seed_from_creator(
        &self,
        group_id: GroupId,
        creator_id: &UserId,
    ) -> Result<Option<GroupCharacteristicProfile>, DomainError> {
        if self.directory.find_group(group_id).await?.is_none() {
            tracing::debug!(group_id = %group_id, "seed for unknown group skipped");
            return Ok(None);
        }

        let contributions = self.contributions(std::slice::from_ref(creator_id)).await?;
        let aggregate = aggregate_members(&contributions);
        let seeded = GroupCharacteristicProfile::new(
            group_id,
            aggregate.average_scores,
            aggregate.member_count_contributing,
            Timestamp::now(),
        );

        if self.group_profiles.insert_if_absent(&seeded).await? {
            tracing::debug!(group_id = %group_id, creator_id = %creator_id, "group profile seeded");
            return Ok(Some(seeded));
        }
        self.group_profiles.find(group_id).await
    }

    async fn discard(&self, group_id: GroupId) -> Result<(), DomainError> {
        self.group_profiles.delete(group_id).await
    }
}
