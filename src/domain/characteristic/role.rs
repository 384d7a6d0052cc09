//! Behavioral roles measured by the onboarding quiz.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One of the seven fixed behavioral categories.
///
/// Declaration order defines the component index inside a `RoleVector`
/// and carries no other meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Leader,
    Planner,
    Expert,
    Creative,
    Communicator,
    TeamPlayer,
    Challenger,
}

impl Role {
    /// Number of roles, and therefore the dimension of every `RoleVector`.
    pub const COUNT: usize = 7;

    /// All roles in vector index order.
    pub const ALL: [Role; Role::COUNT] = [
        Role::Leader,
        Role::Planner,
        Role::Expert,
        Role::Creative,
        Role::Communicator,
        Role::TeamPlayer,
        Role::Challenger,
    ];

    /// Component index inside a `RoleVector`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name used in answer keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Leader => "LEADER",
            Role::Planner => "PLANNER",
            Role::Expert => "EXPERT",
            Role::Creative => "CREATIVE",
            Role::Communicator => "COMMUNICATOR",
            Role::TeamPlayer => "TEAM_PLAYER",
            Role::Challenger => "CHALLENGER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| ValidationError::invalid_format("role", format!("unknown role '{}'", s)))
    }
}
