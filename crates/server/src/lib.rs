//! Chirp Server Library
//!
//! Thin HTTP boundary over `chirp-core`: decodes requests, calls one core
//! operation, and renders the classified result.

pub mod config;
pub mod ctx;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;

use std::net::SocketAddr;
use tracing::info;

use config::{AppState, ServerConfig};

pub use router::router;

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    info!("=== Chirp Server ===");
    info!("Database: {:?}", config.db_path);
    info!("Static root: {:?}", config.static_root);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config)?;
    let app = router(state);

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
