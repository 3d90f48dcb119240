//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL). In-memory stores are used when absent.
    pub database_url: Option<String>,

    /// Event sink provider (log, webhook, mock)
    pub event_sink_provider: String,
    /// Target URL for the webhook event sink
    pub event_webhook_url: Option<String>,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let event_sink_provider =
            lookup("EVENT_SINK_PROVIDER").unwrap_or_else(|| "log".to_string());
        let event_webhook_url = lookup("EVENT_WEBHOOK_URL").filter(|url| !url.is_empty());

        if event_sink_provider == "webhook" && event_webhook_url.is_none() {
            return Err(anyhow::anyhow!(
                "EVENT_WEBHOOK_URL is required when EVENT_SINK_PROVIDER=webhook"
            ));
        }

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got '{}'", raw))?,
            None => 3000,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            event_sink_provider,
            event_webhook_url,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "taskboard=debug".to_string()),
            port,
        })
    }
}
