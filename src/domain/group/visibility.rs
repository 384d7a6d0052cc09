//! Group visibility and meeting availability enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Who may discover a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupVisibility {
    /// Listed for everyone enrolled in the course.
    Public,
    /// Listed, but joining needs approval from the group.
    CourseOnly,
    /// Invitation only. Never recommended.
    Private,
}

impl GroupVisibility {
    /// Private groups never enter match results.
    pub fn is_discoverable(&self) -> bool {
        !matches!(self, GroupVisibility::Private)
    }
}

impl fmt::Display for GroupVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupVisibility::Public => "public",
            GroupVisibility::CourseOnly => "course_only",
            GroupVisibility::Private => "private",
        };
        f.write_str(s)
    }
}

impl FromStr for GroupVisibility {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(GroupVisibility::Public),
            "course_only" | "course-only" => Ok(GroupVisibility::CourseOnly),
            "private" => Ok(GroupVisibility::Private),
            other => Err(ValidationError::invalid_format(
                "visibility",
                format!("unknown visibility '{}'", other),
            )),
        }
    }
}

/// When a group usually meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Weekdays,
    Evenings,
    Weekends,
    /// Meets whenever members agree; satisfies any availability filter.
    Flexible,
}

impl Availability {
    /// True if a group with this availability satisfies a `wanted` filter.
    pub fn satisfies(&self, wanted: Availability) -> bool {
        *self == Availability::Flexible || *self == wanted
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Availability::Weekdays => "weekdays",
            Availability::Evenings => "evenings",
            Availability::Weekends => "weekends",
            Availability::Flexible => "flexible",
        };
        f.write_str(s)
    }
}

impl FromStr for Availability {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekdays" => Ok(Availability::Weekdays),
            "evenings" => Ok(Availability::Evenings),
            "weekends" => Ok(Availability::Weekends),
            "flexible" => Ok(Availability::Flexible),
            other => Err(ValidationError::invalid_format(
                "availability",
                format!("unknown availability '{}'", other),
            )),
        }
    }
}
