//! RecomputeEventHandler - bridges the event bus to the dispatcher.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::domain::characteristic::CharacteristicProfileUpdated;
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::domain::group::{GroupMembershipChanged, StudyGroupCreated, StudyGroupDeleted};
use crate::ports::{EventHandler, EventSubscriber};

use super::RecomputeDispatcher;

/// Event types that affect group profiles.
pub const RECOMPUTE_EVENT_TYPES: [&str; 4] = [
    CharacteristicProfileUpdated::EVENT_TYPE,
    StudyGroupCreated::EVENT_TYPE,
    GroupMembershipChanged::EVENT_TYPE,
    StudyGroupDeleted::EVENT_TYPE,
];

pub struct RecomputeEventHandler {
    dispatcher: RecomputeDispatcher,
}

impl RecomputeEventHandler {
    pub fn new(dispatcher: RecomputeDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Subscribes a handler for every recompute-relevant event type.
    pub fn register(subscriber: &dyn EventSubscriber, dispatcher: RecomputeDispatcher) -> Arc<Self> {
        let handler = Arc::new(Self::new(dispatcher));
        subscriber.subscribe_all(&RECOMPUTE_EVENT_TYPES, handler.clone());
        tracing::info!(event_types = ?RECOMPUTE_EVENT_TYPES, "recompute handler registered");
        handler
    }
}

fn decode<T: DeserializeOwned>(event: &EventEnvelope) -> Result<T, DomainError> {
    event.payload_as().map_err(|e| {
        DomainError::new(
            ErrorCode::InvalidFormat,
            format!("Malformed {} payload: {}", event.event_type, e),
        )
        .with_detail("event_id", event.event_id.to_string())
    })
}

#[async_trait]
impl EventHandler for RecomputeEventHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        match event.event_type.as_str() {
            CharacteristicProfileUpdated::EVENT_TYPE => {
                let payload: CharacteristicProfileUpdated = decode(&event)?;
                self.dispatcher.on_profile_updated(&payload.user_id).await?;
            }
            StudyGroupCreated::EVENT_TYPE => {
                let payload: StudyGroupCreated = decode(&event)?;
                self.dispatcher
                    .on_group_created(payload.group_id, &payload.creator_id)
                    .await?;
            }
            GroupMembershipChanged::EVENT_TYPE => {
                let payload: GroupMembershipChanged = decode(&event)?;
                self.dispatcher.on_membership_changed(payload.group_id)?;
            }
            StudyGroupDeleted::EVENT_TYPE => {
                let payload: StudyGroupDeleted = decode(&event)?;
                self.dispatcher.on_group_deleted(payload.group_id).await?;
            }
            other => {
                tracing::debug!(event_type = other, "event ignored by recompute handler");
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RecomputeEventHandler"
    }
}
