//! GroupDirectory port - read access to groups and their membership.
//!
//! Group management lives outside this crate; the engine only reads the
//! listing data the hard filters and the aggregator need.

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError, GroupId, UserId};
use crate::domain::group::GroupListing;

#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// Returns `None` for unknown or deleted groups.
    async fn find_group(&self, group_id: GroupId) -> Result<Option<GroupListing>, DomainError>;

    /// Current members, or `None` when the group does not exist.
    async fn list_members(&self, group_id: GroupId) -> Result<Option<Vec<UserId>>, DomainError>;

    /// Every group the user currently belongs to.
    async fn groups_for_user(&self, user_id: &UserId) -> Result<Vec<GroupId>, DomainError>;

    /// All groups attached to any of the given courses.
    async fn list_groups_in_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<GroupListing>, DomainError>;
}
