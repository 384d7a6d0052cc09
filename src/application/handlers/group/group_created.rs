//! GroupCreatedHandler - announces a new group to the engine.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope, EventId, GroupId, Timestamp, UserId};
use crate::domain::group::StudyGroupCreated;
use crate::ports::EventPublisher;

#[derive(Debug, Clone)]
pub struct GroupCreatedCommand {
    pub group_id: GroupId,
    pub creator_id: UserId,
}

/// Called by group management once a group exists.
///
/// Returns after the group profile has been seeded; the full recompute runs
/// in the background.
pub struct GroupCreatedHandler {
    event_publisher: Arc<dyn EventPublisher>,
}

impl GroupCreatedHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self { event_publisher }
    }

    pub async fn handle(&self, cmd: GroupCreatedCommand) -> Result<StudyGroupCreated, DomainError> {
        let event = StudyGroupCreated {
            event_id: EventId::new(),
            group_id: cmd.group_id,
            creator_id: cmd.creator_id,
            created_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)?.with_user_id(event.creator_id.to_string());
        self.event_publisher.publish(envelope).await?;

        tracing::info!(group_id = %event.group_id, creator_id = %event.creator_id, "group created");
        Ok(event)
    }
}
