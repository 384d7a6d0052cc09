//! In-memory event bus.
//!
//! Delivers events synchronously, in subscription order, on the publisher's
//! task. Recompute consumers only enqueue work, so delivery stays cheap and
//! the producer returns without waiting for aggregation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// Process-wide event bus.
///
/// `new()` also records every published envelope for inspection in tests.
/// Long-running processes use `without_capture()`, which only dispatches.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// RecomputeEventHandler::register(bus.as_ref(), dispatcher.clone());
///
/// bus.publish(envelope).await?;
/// assert!(bus.has_event(StudyGroupCreated::EVENT_TYPE));
/// ```
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    published: RwLock<Vec<EventEnvelope>>,
    capture: bool,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(Vec::new()),
            capture: true,
        }
    }

    /// Bus that delivers to handlers without retaining envelopes.
    pub fn without_capture() -> Self {
        Self {
            capture: false,
            ..Self::new()
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capture
    }

    // === Inspection ===

    /// Returns all published events.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns events for a specific aggregate (user id or group id).
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .collect()
    }

    /// Clears captured events. Subscriptions are kept.
    pub fn clear(&self) {
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.event_type == event_type)
    }

    /// Number of handlers subscribed to `event_type`.
    pub fn handler_count(&self, event_type: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .map_or(0, Vec::len)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.capture {
            self.published
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        }

        // Clone handlers to release lock before await points
        let type_handlers: Vec<Arc<dyn EventHandler>> = {
            let handlers = self
                .handlers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            handlers
                .get(&event.event_type)
                .cloned()
                .unwrap_or_default()
        };

        let mut errors = Vec::new();
        for handler in type_handlers {
            if let Err(e) = handler.handle(event.clone()).await {
                tracing::warn!(
                    handler = handler.name(),
                    event_type = %event.event_type,
                    error = %e,
                    "event handler failed"
                );
                errors.push(format!("{}: {}", handler.name(), e));
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Handler errors: {}", errors.join(", ")),
            ));
        }

        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for event_type in event_types {
            handlers
                .entry(event_type.to_string())
                .or_default()
                .push(Arc::clone(&handler));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{GroupId, Timestamp};
    use crate::domain::group::{GroupMembershipChanged, MembershipChange, StudyGroupDeleted};
    use crate::domain::foundation::EventId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn membership_envelope(group_id: GroupId) -> EventEnvelope {
        EventEnvelope::from_event(&GroupMembershipChanged {
            event_id: EventId::new(),
            group_id,
            user_id: None,
            change: MembershipChange::Joined,
            changed_at: Timestamp::now(),
        })
        .unwrap()
    }

    fn deleted_envelope(group_id: GroupId) -> EventEnvelope {
        EventEnvelope::from_event(&StudyGroupDeleted {
            event_id: EventId::new(),
            group_id,
            deleted_at: Timestamp::now(),
        })
        .unwrap()
    }

    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    #[tokio::test]
    async fn publish_captures_event() {
        let bus = InMemoryEventBus::new();

        bus.publish(membership_envelope(GroupId::new())).await.unwrap();

        assert_eq!(bus.event_count(), 1);
        assert!(bus.has_event(GroupMembershipChanged::EVENT_TYPE));
    }

    #[tokio::test]
    async fn bus_without_capture_dispatches_but_retains_nothing() {
        let bus = InMemoryEventBus::without_capture();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.subscribe(
            GroupMembershipChanged::EVENT_TYPE,
            Arc::new(CountingHandler(counter.clone())),
        );

        for _ in 0..100 {
            bus.publish(membership_envelope(GroupId::new())).await.unwrap();
        }

        assert!(!bus.is_capturing());
        assert_eq!(counter.load(Ordering::SeqCst), 100);
        assert_eq!(bus.event_count(), 0);
        assert!(bus.published_events().is_empty());
    }

    #[tokio::test]
    async fn filters_by_type_and_aggregate() {
        let bus = InMemoryEventBus::new();
        let group = GroupId::new();

        bus.publish(membership_envelope(group)).await.unwrap();
        bus.publish(membership_envelope(GroupId::new())).await.unwrap();
        bus.publish(deleted_envelope(group)).await.unwrap();

        assert_eq!(bus.events_of_type(GroupMembershipChanged::EVENT_TYPE).len(), 2);
        assert_eq!(bus.events_for_aggregate(&group.to_string()).len(), 2);
    }

    #[tokio::test]
    async fn every_subscribed_handler_is_invoked() {
        let bus = InMemoryEventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe(
            GroupMembershipChanged::EVENT_TYPE,
            Arc::new(CountingHandler(counter.clone())),
        );
        bus.subscribe(
            GroupMembershipChanged::EVENT_TYPE,
            Arc::new(CountingHandler(counter.clone())),
        );

        bus.publish(membership_envelope(GroupId::new())).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(bus.handler_count(GroupMembershipChanged::EVENT_TYPE), 2);
    }

    #[tokio::test]
    async fn subscribe_all_ignores_unsubscribed_types() {
        let bus = InMemoryEventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe_all(
            &[GroupMembershipChanged::EVENT_TYPE],
            Arc::new(CountingHandler(counter.clone())),
        );

        bus.publish(membership_envelope(GroupId::new())).await.unwrap();
        bus.publish(deleted_envelope(GroupId::new())).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_drops_captured_events() {
        let bus = InMemoryEventBus::new();
        bus.publish_all(vec![
            membership_envelope(GroupId::new()),
            deleted_envelope(GroupId::new()),
        ])
        .await
        .unwrap();
        assert_eq!(bus.event_count(), 2);

        bus.clear();

        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn handler_error_is_propagated() {
        let bus = InMemoryEventBus::new();

        struct FailingHandler;

        #[async_trait]
        impl EventHandler for FailingHandler {
            async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
                Err(DomainError::new(ErrorCode::InternalError, "Handler failed"))
            }
            fn name(&self) -> &'static str {
                "FailingHandler"
            }
        }

        bus.subscribe(GroupMembershipChanged::EVENT_TYPE, Arc::new(FailingHandler));
        let result = bus.publish(membership_envelope(GroupId::new())).await;

        assert!(result.unwrap_err().message.contains("FailingHandler"));
    }
}
