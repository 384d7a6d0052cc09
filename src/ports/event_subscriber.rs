//! EventSubscriber port - registering consumers of domain events.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Idempotent** - the same event may be delivered more than once
/// - **Quick** - heavy work is handed off (e.g. to the recompute dispatcher)
/// - **Isolated** - errors don't affect other handlers
///
/// # Example
///
/// ```ignore
/// #[async_trait]
/// impl EventHandler for RecomputeEventHandler {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let payload: GroupMembershipChanged = event.payload_as()?;
///         self.dispatcher.on_membership_changed(payload.group_id)
///     }
///
///     fn name(&self) -> &'static str {
///         "RecomputeEventHandler"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
///
/// Consumers are registered once at startup, before the first publish.
///
/// ```ignore
/// subscriber.subscribe_all(
///     &[StudyGroupCreated::EVENT_TYPE, GroupMembershipChanged::EVENT_TYPE],
///     handler,
/// );
/// ```
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to multiple event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// Combined trait for event bus implementations.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}
