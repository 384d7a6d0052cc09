//! Study group domain events.
//!
//! Events published by the group-management layer that drive recomputation:
//! - `StudyGroupCreated` - New group created by a user
//! - `GroupMembershipChanged` - A member joined or left
//! - `StudyGroupDeleted` - Group removed

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, GroupId, Timestamp, UserId};

// ════════════════════════════════════════════════════════════════════════════
// StudyGroupCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a new study group is created.
///
/// The creator is its first member, so the group profile is seeded from
/// the creator's profile before any join is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyGroupCreated {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the created group.
    pub group_id: GroupId,

    /// User who created the group.
    pub creator_id: UserId,

    /// When the group was created.
    pub created_at: Timestamp,
}

impl StudyGroupCreated {
    pub const EVENT_TYPE: &'static str = "group.created.v1";
}

domain_event!(
    StudyGroupCreated,
    event_type = "group.created.v1",
    schema_version = 1,
    aggregate_id = group_id,
    aggregate_type = "StudyGroup",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// GroupMembershipChanged
// ════════════════════════════════════════════════════════════════════════════

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    Joined,
    Left,
}

/// Published when a user joins or leaves a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMembershipChanged {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// Group whose membership changed.
    pub group_id: GroupId,

    /// Member who joined or left, when known.
    pub user_id: Option<UserId>,

    /// Join or leave.
    pub change: MembershipChange,

    /// When the change happened.
    pub changed_at: Timestamp,
}

impl GroupMembershipChanged {
    pub const EVENT_TYPE: &'static str = "group.membership_changed.v1";
}

domain_event!(
    GroupMembershipChanged,
    event_type = "group.membership_changed.v1",
    schema_version = 1,
    aggregate_id = group_id,
    aggregate_type = "StudyGroup",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// StudyGroupDeleted
// ════════════════════════════════════════════════════════════════════════════

/// Published when a group is deleted; its derived profile goes with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyGroupDeleted {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the deleted group.
    pub group_id: GroupId,

    /// When the group was deleted.
    pub deleted_at: Timestamp,
}

impl StudyGroupDeleted {
    pub const EVENT_TYPE: &'static str = "group.deleted.v1";
}

domain_event!(
    StudyGroupDeleted,
    event_type = "group.deleted.v1",
    schema_version = 1,
    aggregate_id = group_id,
    aggregate_type = "StudyGroup",
    occurred_at = deleted_at,
    event_id = event_id
);
