//! Webhook Event Sink Implementation
//!
//! POSTs batches of events as a JSON array to a configured URL.

use crate::{EventSink, EventSinkError, OutboundEvent};

/// HTTP sink delivering events to a webhook endpoint.
pub struct WebhookEventSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookEventSink {
    /// Create a new webhook sink targeting `url`.
    pub fn new(url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl EventSink for WebhookEventSink {
    async fn publish(&self, event: OutboundEvent) -> Result<(), EventSinkError> {
        self.publish_all(vec![event]).await
    }

    async fn publish_all(&self, events: Vec<OutboundEvent>) -> Result<(), EventSinkError> {
        if events.is_empty() {
            return Ok(());
        }

        let response = self
            .http
            .post(&self.url)
            .json(&events)
            .send()
            .await
            .map_err(|e| EventSinkError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(EventSinkError::Response(format!(
                "Webhook returned {}: {}",
                status, body
            )));
        }

        tracing::debug!(count = events.len(), "Webhook events delivered");
        Ok(())
    }
}
