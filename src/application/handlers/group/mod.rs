//! Group lifecycle notifications from group management.

mod group_created;
mod group_deleted;
mod membership_changed;

pub use group_created::{GroupCreatedCommand, GroupCreatedHandler};
pub use group_deleted::{GroupDeletedCommand, GroupDeletedHandler};
pub use membership_changed::{MembershipChangedCommand, MembershipChangedHandler};
