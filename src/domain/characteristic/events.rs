//! Characteristic profile domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, Timestamp, UserId};

use super::QuizStatus;

/// Published after a profile write commits (answer submission or retake).
///
/// Consumers fan this out to every group the user belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacteristicProfileUpdated {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// Owner of the updated profile.
    pub user_id: UserId,

    /// Profile version after the write.
    pub version: u64,

    /// Quiz status after the write.
    pub quiz_status: QuizStatus,

    /// When the write committed.
    pub updated_at: Timestamp,
}

impl CharacteristicProfileUpdated {
    pub const EVENT_TYPE: &'static str = "characteristic.profile_updated.v1";
}

domain_event!(
    CharacteristicProfileUpdated,
    event_type = "characteristic.profile_updated.v1",
    schema_version = 1,
    aggregate_id = user_id,
    aggregate_type = "CharacteristicProfile",
    occurred_at = updated_at,
    event_id = event_id
);
