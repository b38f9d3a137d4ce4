//! In-process event bus backed by a tokio broadcast channel.
//!
//! Every subscriber sees every event published after it subscribed.
//! Publishing is fire-and-forget: when no subscriber is listening the
//! event is silently dropped, which keeps request handlers decoupled
//! from whoever consumes the stream.

use chrono::{DateTime, Utc};
use revops_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Buffered events per subscriber before the channel starts lagging.
const DEFAULT_CAPACITY: usize = 1024;

/// A single domain event flowing through the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `appointment.received`.
    pub event_type: String,
    /// Tenant the event belongs to, if any.
    pub company_id: Option<DbId>,
    /// Entity type that triggered the event, e.g. `sale`.
    pub source_entity_type: Option<String>,
    /// Row id of the triggering entity.
    pub source_entity_id: Option<DbId>,
    /// Event-specific details.
    pub payload: serde_json::Value,
    /// When the event was published.
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            company_id: None,
            source_entity_type: None,
            source_entity_id: None,
            payload: serde_json::Value::Null,
            timestamp: Utc::now(),
        }
    }

    pub fn with_company(mut self, company_id: DbId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Cloneable handle for publishing and subscribing to platform events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Send errors only mean nobody is subscribed right now; the event
    /// is dropped rather than surfaced to the publisher.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn published_events_reach_subscribers() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            PlatformEvent::new("sale.created")
                .with_company(7)
                .with_source("sale", 42),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, "sale.created");
        assert_eq!(event.company_id, Some(7));
        assert_eq!(event.source_entity_type.as_deref(), Some("sale"));
        assert_eq!(event.source_entity_id, Some(42));
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(PlatformEvent::new("appointment.received"));

        assert_eq!(first.recv().await.unwrap().event_type, "appointment.received");
        assert_eq!(second.recv().await.unwrap().event_type, "appointment.received");
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_a_no_op() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new("sale.created"));
    }

    #[tokio::test]
    async fn new_events_default_to_null_payload_and_no_tenant() {
        let event = PlatformEvent::new("sale.matched");
        assert!(event.company_id.is_none());
        assert!(event.source_entity_type.is_none());
        assert!(event.source_entity_id.is_none());
        assert!(event.payload.is_null());
    }
}
