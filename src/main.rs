//! Shopdraft Document Server
//!
//! A small JSON document store that the `shopdraft` CLI pulls the product
//! list from and pushes it to.
//!
//! # Configuration
//!
//! Environment variables:
//! - `SHOPDRAFT_SERVER_PORT`: Port to listen on (default: 8080)
//! - `SHOPDRAFT_SERVER_DATA_DIR`: Directory to store documents (default: ~/.local/share/shopdraft-server)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check endpoint
//! - `GET /documents/{id}`: Read a document
//! - `POST /documents/{id}`: Replace a document

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod routes;
mod storage;

use config::Config;
use routes::AppState;
use storage::DocumentStorage;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopdraft_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        tracing::error!("Failed to create data directory: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Data directory: {}", config.data_dir.display());

    let app = routes::router(AppState::new(DocumentStorage::new(config.data_dir)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
