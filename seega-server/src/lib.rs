//! SEEGA Server - HTTP transport for a game session
//!
//! This crate exposes one `SessionCoordinator` to remote players:
//! - Registration (two seats, first come first served)
//! - Placement, movement, chat and resignation
//! - Mailbox polling with an optional bounded wait
//! - Game state snapshots
//!
//! On startup the listening address is written to an endpoint file so that
//! clients can discover the server.

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Where the endpoint descriptor is written at startup
    pub endpoint_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8002,
            endpoint_file: PathBuf::from("seega_uri.txt"),
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Seats
        .route("/api/register", post(routes::players::register))
        // Game actions
        .route("/api/place", post(routes::game::place_piece))
        .route("/api/move", post(routes::game::move_piece))
        .route("/api/resign", post(routes::game::resign))
        .route("/api/state", get(routes::game::get_state))
        // Messaging
        .route("/api/chat", post(routes::mailbox::chat))
        .route("/api/poll", get(routes::mailbox::poll))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(ServerState::new());
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    let endpoint = write_endpoint_file(&config.endpoint_file, local_addr).await?;

    tracing::info!("SEEGA Server listening on {}", endpoint);
    tracing::info!("Endpoint written to: {}", config.endpoint_file.display());

    axum::serve(listener, router).await?;

    Ok(())
}

/// Write the endpoint descriptor clients read to find the server
async fn write_endpoint_file(path: &Path, addr: SocketAddr) -> anyhow::Result<String> {
    let endpoint = format!("http://{addr}");
    tokio::fs::write(path, &endpoint).await?;
    Ok(endpoint)
}
