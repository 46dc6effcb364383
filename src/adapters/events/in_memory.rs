//! In-memory event publisher.
//!
//! Records every envelope so tests can assert on `published()`. The vector
//! grows without bound, so this publisher is for tests and short-lived
//! tooling only; the server binary uses `TracingEventPublisher`.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::debug;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

#[derive(Default)]
pub struct InMemoryEventPublisher {
    events: Mutex<Vec<EventEnvelope>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All envelopes published so far, in order.
    pub fn published(&self) -> Vec<EventEnvelope> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        debug!(
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            event_id = %event.event_id,
            "domain event published"
        );
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
