//! Mock Event Sink Implementation
//!
//! Stores events in memory for test assertions.
//! Thread-safe via `Arc<Mutex<>>`.

use crate::{EventSink, EventSinkError, OutboundEvent};
use std::sync::{Arc, Mutex};

/// Mock event sink that records events for test assertions.
#[derive(Debug, Clone)]
pub struct MockEventSink {
    events: Arc<Mutex<Vec<OutboundEvent>>>,
    fail: bool,
}

impl MockEventSink {
    /// Create a new mock event sink.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Create a mock sink that rejects every publish.
    pub fn failing() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Return all recorded events.
    pub fn recorded_events(&self) -> Vec<OutboundEvent> {
        self.events
            .lock()
            .expect("events lock poisoned, a prior test panicked")
            .clone()
    }

    /// Return the names of all recorded events, in delivery order.
    pub fn recorded_names(&self) -> Vec<String> {
        self.recorded_events().into_iter().map(|e| e.name).collect()
    }

    /// Clear all recorded events.
    pub fn reset(&self) {
        self.events
            .lock()
            .expect("events lock poisoned, a prior test panicked")
            .clear();
    }
}

impl Default for MockEventSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EventSink for MockEventSink {
    async fn publish(&self, event: OutboundEvent) -> Result<(), EventSinkError> {
        if self.fail {
            return Err(EventSinkError::Request(format!(
                "mock sink rejected event {}",
                event.name
            )));
        }
        tracing::debug!(event_name = %event.name, "Mock event sink: recording event");
        self.events
            .lock()
            .map_err(|e| EventSinkError::Request(format!("events lock poisoned: {e}")))?
            .push(event);
        Ok(())
    }
}
