//! Study group module.
//!
//! Group listings (owned by the group-management layer), the derived
//! group characteristic profile, and group lifecycle events.

mod events;
mod group_profile;
mod listing;
mod visibility;

pub use events::{GroupMembershipChanged, MembershipChange, StudyGroupCreated, StudyGroupDeleted};
pub use group_profile::GroupCharacteristicProfile;
pub use listing::GroupListing;
pub use visibility::{Availability, GroupVisibility};
