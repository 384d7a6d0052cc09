//! In-memory group directory and enrollment registry.
//!
//! Stands in for the group-management and course systems. Membership
//! mutators keep each listing's `current_member_count` in step with the
//! member set.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, GroupId, UserId};
use crate::domain::group::GroupListing;
use crate::ports::{EnrollmentReader, GroupDirectory};

#[derive(Debug, Default)]
struct DirectoryState {
    groups: HashMap<GroupId, GroupListing>,
    members: HashMap<GroupId, BTreeSet<UserId>>,
    enrollments: HashMap<UserId, BTreeSet<CourseId>>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a group with no members; the listing's count is reset to 0.
    pub async fn add_group(&self, listing: GroupListing) {
        let mut state = self.state.write().await;
        let group_id = listing.group_id;
        state.groups.insert(group_id, listing.with_member_count(0));
        state.members.insert(group_id, BTreeSet::new());
    }

    pub async fn remove_group(&self, group_id: GroupId) {
        let mut state = self.state.write().await;
        state.groups.remove(&group_id);
        state.members.remove(&group_id);
    }

    /// Adds a member. Returns `false` if they already belonged to the group.
    ///
    /// # Errors
    ///
    /// - `GroupNotFound` for unknown groups
    pub async fn add_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let DirectoryState { groups, members, .. } = &mut *state;
        let listing = groups.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;
        let set = members.entry(group_id).or_default();
        let inserted = set.insert(user_id);
        listing.current_member_count = member_count(set);
        Ok(inserted)
    }

    /// Removes a member. Returns `false` if they were not a member.
    pub async fn remove_member(
        &self,
        group_id: GroupId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let DirectoryState { groups, members, .. } = &mut *state;
        let listing = groups.get_mut(&group_id).ok_or_else(|| group_not_found(group_id))?;
        let set = members.entry(group_id).or_default();
        let removed = set.remove(user_id);
        listing.current_member_count = member_count(set);
        Ok(removed)
    }

    pub async fn enroll(&self, user_id: UserId, course_id: CourseId) {
        self.state
            .write()
            .await
            .enrollments
            .entry(user_id)
            .or_default()
            .insert(course_id);
    }
}

fn member_count(set: &BTreeSet<UserId>) -> u32 {
    u32::try_from(set.len()).unwrap_or(u32::MAX)
}

fn group_not_found(group_id: GroupId) -> DomainError {
    DomainError::new(ErrorCode::GroupNotFound, format!("Group {} not found", group_id))
        .with_detail("group_id", group_id.to_string())
}

#[async_trait]
impl GroupDirectory for InMemoryGroupDirectory {
    async fn find_group(&self, group_id: GroupId) -> Result<Option<GroupListing>, DomainError> {
        Ok(self.state.read().await.groups.get(&group_id).cloned())
    }

    async fn list_members(&self, group_id: GroupId) -> Result<Option<Vec<UserId>>, DomainError> {
        let state = self.state.read().await;
        if !state.groups.contains_key(&group_id) {
            return Ok(None);
        }
        Ok(Some(
            state
                .members
                .get(&group_id)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default(),
        ))
    }

    async fn groups_for_user(&self, user_id: &UserId) -> Result<Vec<GroupId>, DomainError> {
        let state = self.state.read().await;
        let mut groups: Vec<GroupId> = state
            .members
            .iter()
            .filter(|(_, members)| members.contains(user_id))
            .map(|(group_id, _)| *group_id)
            .collect();
        groups.sort();
        Ok(groups)
    }

    async fn list_groups_in_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<GroupListing>, DomainError> {
        let state = self.state.read().await;
        let mut listings: Vec<GroupListing> = state
            .groups
            .values()
            .filter(|g| course_ids.contains(&g.course_id))
            .cloned()
            .collect();
        listings.sort_by_key(|g| g.group_id);
        Ok(listings)
    }
}

#[async_trait]
impl EnrollmentReader for InMemoryGroupDirectory {
    async fn enrolled_courses(&self, user_id: &UserId) -> Result<Vec<CourseId>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .enrollments
            .get(user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }
}
