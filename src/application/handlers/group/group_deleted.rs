//! GroupDeletedHandler - announces group removal.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope, EventId, GroupId, Timestamp};
use crate::domain::group::StudyGroupDeleted;
use crate::ports::EventPublisher;

#[derive(Debug, Clone)]
pub struct GroupDeletedCommand {
    pub group_id: GroupId,
}

pub struct GroupDeletedHandler {
    event_publisher: Arc<dyn EventPublisher>,
}

impl GroupDeletedHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self { event_publisher }
    }

    pub async fn handle(&self, cmd: GroupDeletedCommand) -> Result<StudyGroupDeleted, DomainError> {
        let event = StudyGroupDeleted {
            event_id: EventId::new(),
            group_id: cmd.group_id,
            deleted_at: Timestamp::now(),
        };
        self.event_publisher
            .publish(EventEnvelope::from_event(&event)?)
            .await?;

        tracing::info!(group_id = %event.group_id, "group deleted");
        Ok(event)
    }
}
