//! Taskboard Event Sinks
//!
//! Delivers drained domain events to subscribers after a successful save:
//! - Webhook sink that POSTs events as JSON to a configured URL
//! - Log sink that records each event through `tracing`
//! - Mock sink that keeps events in memory for test assertions

pub mod log;
pub mod mock;
pub mod webhook;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum EventSinkError {
    #[error("Event sink configuration error: {0}")]
    Configuration(String),

    #[error("Event sink request error: {0}")]
    Request(String),

    #[error("Event sink response error: {0}")]
    Response(String),
}

/// A domain event in its transport form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    /// Unique event identifier, assigned when the event was raised
    pub id: Uuid,
    /// Event name, e.g. `TaskCreated`
    pub name: String,
    /// Instant the event was raised
    pub occurred_at: DateTime<Utc>,
    /// Event payload
    pub data: serde_json::Value,
}

/// Event sink configuration.
#[derive(Debug, Clone)]
pub struct EventSinkConfig {
    /// Sink provider (log, webhook, mock)
    pub provider: String,
    /// Target URL for the webhook provider
    pub webhook_url: Option<String>,
}

impl EventSinkConfig {
    /// Reject configurations the factory cannot satisfy.
    pub fn validate(&self) -> Result<(), EventSinkError> {
        if self.provider == "webhook"
            && self.webhook_url.as_deref().map_or(true, str::is_empty)
        {
            return Err(EventSinkError::Configuration(
                "EVENT_WEBHOOK_URL is required for webhook provider".to_string(),
            ));
        }
        Ok(())
    }
}

/// Event sink trait for different delivery implementations.
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver a single event.
    async fn publish(&self, event: OutboundEvent) -> Result<(), EventSinkError>;

    /// Deliver a batch of events, preserving their order.
    async fn publish_all(&self, events: Vec<OutboundEvent>) -> Result<(), EventSinkError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

/// Factory for creating EventSink implementations.
pub struct EventSinkFactory;

impl EventSinkFactory {
    /// Create an EventSink based on configuration.
    pub fn create(config: EventSinkConfig) -> Result<Box<dyn EventSink>, EventSinkError> {
        config.validate()?;
        match config.provider.as_str() {
            "webhook" => {
                tracing::info!("Creating webhook event sink");
                let url = config.webhook_url.unwrap_or_default();
                Ok(Box::new(webhook::WebhookEventSink::new(url)))
            }
            "log" => {
                tracing::info!("Creating log event sink");
                Ok(Box::new(log::LogEventSink))
            }
            "mock" => {
                tracing::info!("Creating mock event sink");
                Ok(Box::new(mock::MockEventSink::new()))
            }
            provider => Err(EventSinkError::Configuration(format!(
                "Unknown event sink provider: {}. Supported providers: webhook, log, mock",
                provider
            ))),
        }
    }
}
