// Taskboard API - Local Development Server

use std::net::SocketAddr;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use taskboard_common::config::Config;
use taskboard_projects::{Entity, InMemoryStore, User, UserRole};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .pretty()
        .init();

    info!("Starting Taskboard API local development server");

    let store = InMemoryStore::new();
    if config.database_url.is_none() {
        seed_demo_users(&store)?;
    }

    let app = taskboard_app::create_app(&config, store)
        .await
        .map_err(|e| {
            error!("Failed to create application: {}", e);
            e
        })?;

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .into_inner(),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("Server starting on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Without a database there is no way to register users, so start with one
/// member and one manager.
fn seed_demo_users(store: &InMemoryStore) -> anyhow::Result<()> {
    let member = User::new(
        Some("Demo Member".to_string()),
        Some("member@taskboard.local".to_string()),
        UserRole::Member,
    )?;
    let manager = User::new(
        Some("Demo Manager".to_string()),
        Some("manager@taskboard.local".to_string()),
        UserRole::Manager,
    )?;

    info!(user_id = %member.id(), role = %member.role(), "Seeded demo user");
    info!(user_id = %manager.id(), role = %manager.role(), "Seeded demo user");

    store.insert_user(member)?;
    store.insert_user(manager)?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
