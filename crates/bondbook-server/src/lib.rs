//! # Bondbook Server
//!
//! REST server for Bondbook, a per-user register of corporate bonds.
//!
//! ## Features
//!
//! - `POST /bonds/`: validate, enrich with the issuer's legal name, store
//! - `GET /bonds/`: the caller's bonds, filtered by exact-match query keys
//! - `GET /health`: liveness and the size of the currency registry
//! - Configuration via TOML file
//!
//! Callers are identified by a header set by an authenticating proxy.
//!
//! ## Usage
//!
//! ```ignore
//! use bondbook_server::{Server, ServerConfig};
//!
//! let server = Server::from_config(ServerConfig::default()).await?;
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bootstrap;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod routes;
pub mod state;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use bondbook_engine::BondService;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError};
pub use state::AppState;

/// The Bondbook server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a server around an existing service.
    pub fn new(config: ServerConfig, service: BondService) -> Result<Self, ServerError> {
        let state = AppState::with_identity_header(service, &config.identity_header)?;
        Ok(Self { config, state })
    }

    /// Build storage, resolver and service from configuration.
    pub async fn from_config(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let service = bootstrap::build_service(&config).await?;
        Self::new(config, service)
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Start the server.
    pub async fn start(&self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr()?;

        info!(
            "Starting Bondbook server on {} (resolver: {}, identity header: {})",
            addr,
            self.state.service.resolver_name(),
            self.state.identity_header
        );

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
