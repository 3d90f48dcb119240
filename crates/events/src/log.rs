//! Log Event Sink Implementation
//!
//! Emits one structured `tracing` record per event. Used when no external
//! subscriber is configured.

use crate::{EventSink, EventSinkError, OutboundEvent};

/// Event sink that writes events to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

#[async_trait::async_trait]
impl EventSink for LogEventSink {
    async fn publish(&self, event: OutboundEvent) -> Result<(), EventSinkError> {
        tracing::info!(
            event_id = %event.id,
            event_name = %event.name,
            occurred_at = %event.occurred_at,
            data = %event.data,
            "Domain event published"
        );
        Ok(())
    }
}
