mod audit;
mod config;
mod errors;
mod guardrails;
mod routes;
mod sandbox;
mod state;

use std::net::SocketAddr;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::audit::store::AuditStore;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let mut config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Warden API v{}", env!("CARGO_PKG_VERSION"));

    // Materialize the workspace home and pin it to its real path, so the
    // sandbox containment check is not fooled by a symlinked home.
    std::fs::create_dir_all(&config.home)?;
    config.home = std::fs::canonicalize(&config.home)?;
    info!("Workspace home: {}", config.home.display());

    // Initialize audit store
    let audit = AuditStore::new(config.audit_dir())?;
    info!("Audit store initialized at {}", config.audit_dir().display());

    // Build app state
    let state = AppState {
        config: config.clone(),
        audit,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // single local user; CORS stays open

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
