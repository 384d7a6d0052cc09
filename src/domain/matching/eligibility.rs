//! Hard eligibility filters applied before any scoring.

use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::domain::foundation::{CourseId, GroupId, ValidationError};
use crate::domain::group::{Availability, GroupListing, GroupVisibility};

/// Facts about the requesting user that the filters need.
#[derive(Debug, Clone, Default)]
pub struct EligibilityContext {
    pub enrolled_courses: HashSet<CourseId>,
    pub memberships: HashSet<GroupId>,
}

impl EligibilityContext {
    pub fn new(
        enrolled_courses: impl IntoIterator<Item = CourseId>,
        memberships: impl IntoIterator<Item = GroupId>,
    ) -> Self {
        Self {
            enrolled_courses: enrolled_courses.into_iter().collect(),
            memberships: memberships.into_iter().collect(),
        }
    }
}

/// Optional caller-supplied narrowing, on top of the mandatory filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilters {
    pub course_id: Option<CourseId>,
    pub visibility: Option<GroupVisibility>,
    pub availability: Option<Availability>,
    pub limit: Option<usize>,
}

/// Untyped filter input as it arrives from an API layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMatchFilters {
    pub course_id: Option<String>,
    pub visibility: Option<String>,
    pub availability: Option<String>,
    pub limit: Option<i64>,
}

impl MatchFilters {
    /// Parses and validates raw filter values.
    pub fn parse(raw: &RawMatchFilters, max_limit: usize) -> Result<Self, ValidationError> {
        let filters = Self {
            course_id: raw.course_id.as_deref().map(CourseId::new).transpose()?,
            visibility: raw.visibility.as_deref().map(str::parse).transpose()?,
            availability: raw.availability.as_deref().map(str::parse).transpose()?,
            limit: raw
                .limit
                .map(|l| check_limit(l, max_limit))
                .transpose()?,
        };
        filters.validate(max_limit)?;
        Ok(filters)
    }

    /// Rejects filters that can never match or exceed configured bounds.
    pub fn validate(&self, max_limit: usize) -> Result<(), ValidationError> {
        if self.visibility == Some(GroupVisibility::Private) {
            return Err(ValidationError::invalid_format(
                "visibility",
                "private groups are never recommended",
            ));
        }
        if let Some(limit) = self.limit {
            check_limit(i64::try_from(limit).unwrap_or(i64::MAX), max_limit)?;
        }
        Ok(())
    }
}

fn check_limit(limit: i64, max_limit: usize) -> Result<usize, ValidationError> {
    let max = i64::try_from(max_limit).unwrap_or(i64::MAX);
    if limit < 1 || limit > max {
        return Err(ValidationError::out_of_range("limit", 1, max, limit));
    }
    usize::try_from(limit).map_err(|_| ValidationError::out_of_range("limit", 1, max, limit))
}

/// Why a group was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Ineligibility {
    #[error("user is not enrolled in the group's course")]
    CourseNotEnrolled,
    #[error("group is at capacity")]
    GroupFull,
    #[error("user is already a member")]
    AlreadyMember,
    #[error("group is private")]
    PrivateGroup,
    #[error("group does not match the course filter")]
    CourseFilterMismatch,
    #[error("group does not match the visibility filter")]
    VisibilityFilterMismatch,
    #[error("group does not match the availability filter")]
    AvailabilityFilterMismatch,
}

/// Applies every hard filter; the first failing predicate is reported.
pub fn check_eligibility(
    group: &GroupListing,
    context: &EligibilityContext,
    filters: &MatchFilters,
) -> Result<(), Ineligibility> {
    if !context.enrolled_courses.contains(&group.course_id) {
        return Err(Ineligibility::CourseNotEnrolled);
    }
    if !group.has_capacity() {
        return Err(Ineligibility::GroupFull);
    }
    if context.memberships.contains(&group.group_id) {
        return Err(Ineligibility::AlreadyMember);
    }
    if !group.visibility.is_discoverable() {
        return Err(Ineligibility::PrivateGroup);
    }
    if let Some(course) = &filters.course_id {
        if *course != group.course_id {
            return Err(Ineligibility::CourseFilterMismatch);
        }
    }
    if let Some(visibility) = filters.visibility {
        if visibility != group.visibility {
            return Err(Ineligibility::VisibilityFilterMismatch);
        }
    }
    if let Some(availability) = filters.availability {
        if !group.availability.satisfies(availability) {
            return Err(Ineligibility::AvailabilityFilterMismatch);
        }
    }
    Ok(())
}
