//! Read model of a study group as seen by the matching engine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, GroupId, ValidationError};

use super::{Availability, GroupVisibility};

/// Group facts owned by the group-management layer.
///
/// Matching only reads these; it never mutates group membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupListing {
    pub group_id: GroupId,
    pub course_id: CourseId,
    pub current_member_count: u32,
    pub max_size: u32,
    pub visibility: GroupVisibility,
    pub availability: Availability,
}

impl GroupListing {
    pub fn new(
        group_id: GroupId,
        course_id: CourseId,
        max_size: u32,
        visibility: GroupVisibility,
        availability: Availability,
    ) -> Result<Self, ValidationError> {
        if max_size == 0 {
            return Err(ValidationError::out_of_range("max_size", 1, i64::from(u32::MAX), 0));
        }
        Ok(Self {
            group_id,
            course_id,
            current_member_count: 0,
            max_size,
            visibility,
            availability,
        })
    }

    pub fn with_member_count(mut self, count: u32) -> Self {
        self.current_member_count = count;
        self
    }

    pub fn has_capacity(&self) -> bool {
        self.current_member_count < self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(max: u32) -> GroupListing {
        GroupListing::new(
            GroupId::new(),
            CourseId::new("CS101").unwrap(),
            max,
            GroupVisibility::Public,
            Availability::Flexible,
        )
        .unwrap()
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(GroupListing::new(
            GroupId::new(),
            CourseId::new("CS101").unwrap(),
            0,
            GroupVisibility::Public,
            Availability::Flexible,
        )
        .is_err());
    }

    #[test]
    fn full_group_has_no_capacity() {
        assert!(listing(4).with_member_count(3).has_capacity());
        assert!(!listing(4).with_member_count(4).has_capacity());
    }
}
