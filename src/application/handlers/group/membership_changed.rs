//! MembershipChangedHandler - announces joins and leaves.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope, EventId, GroupId, Timestamp, UserId};
use crate::domain::group::{GroupMembershipChanged, MembershipChange};
use crate::ports::EventPublisher;

#[derive(Debug, Clone)]
pub struct MembershipChangedCommand {
    pub group_id: GroupId,
    pub user_id: Option<UserId>,
    pub change: MembershipChange,
}

/// Fire-and-forget: returns once the recompute is queued, not finished.
pub struct MembershipChangedHandler {
    event_publisher: Arc<dyn EventPublisher>,
}

impl MembershipChangedHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self { event_publisher }
    }

    pub async fn handle(
        &self,
        cmd: MembershipChangedCommand,
    ) -> Result<GroupMembershipChanged, DomainError> {
        let event = GroupMembershipChanged {
            event_id: EventId::new(),
            group_id: cmd.group_id,
            user_id: cmd.user_id,
            change: cmd.change,
            changed_at: Timestamp::now(),
        };

        let mut envelope = EventEnvelope::from_event(&event)?;
        if let Some(user_id) = &event.user_id {
            envelope = envelope.with_user_id(user_id.to_string());
        }
        self.event_publisher.publish(envelope).await?;

        tracing::debug!(group_id = %event.group_id, change = ?event.change, "membership changed");
        Ok(event)
    }
}
