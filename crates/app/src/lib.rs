//! Taskboard application composition root
//!
//! Wires stores, the event sink and the Projects domain router into a single
//! application.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use taskboard_common::Config;
use taskboard_events::{EventSink, EventSinkConfig, EventSinkFactory};
use taskboard_projects::{InMemoryStore, ProjectService, ProjectsRepositories, ProjectsState};

/// Create the event sink selected by configuration
pub fn create_event_sink(config: &Config) -> Result<Arc<dyn EventSink>, anyhow::Error> {
    let sink = EventSinkFactory::create(EventSinkConfig {
        provider: config.event_sink_provider.clone(),
        webhook_url: config.event_webhook_url.clone(),
    })?;
    Ok(Arc::from(sink))
}

/// Connect to Postgres and apply pending migrations
pub async fn connect_database(database_url: &str) -> Result<PgPool, anyhow::Error> {
    let pool = PgPool::connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;

    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Create the main application router from configuration
///
/// Uses Postgres when `DATABASE_URL` is set, otherwise the given in-memory
/// store.
pub async fn create_app(config: &Config, fallback: InMemoryStore) -> Result<Router, anyhow::Error> {
    let repos = match &config.database_url {
        Some(url) => ProjectsRepositories::postgres(connect_database(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            ProjectsRepositories::in_memory(fallback)
        }
    };

    let events = create_event_sink(config)?;
    Ok(build_router(ProjectService::new(repos, events)))
}

/// Build the router around an already composed service
pub fn build_router(service: ProjectService) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Taskboard API v0.0.1-SNAPSHOT" }),
        )
        .merge(taskboard_projects::routes().with_state(ProjectsState::new(service)))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
