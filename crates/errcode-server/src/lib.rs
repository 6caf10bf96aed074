//! HTTP glue for coded errors
//!
//! Converts handler errors into JSON envelopes carrying the error code and
//! user-safe message, and serves the configured error code catalog.

#![allow(clippy::must_use_candidate)]

pub mod catalog;
mod codes;
mod health;
pub mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use errcode_config::Config;
use tower_http::trace::TraceLayer;

pub use catalog::{Catalog, CodeInfo};
pub use response::{ApiResponse, ErrorResponse, make_response};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
    catalog: Arc<Catalog>,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the code catalog cannot be registered
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let catalog = Arc::new(Catalog::from_config(config)?);

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Code catalog
        if config.server.catalog {
            app = app.merge(codes::codes_router(Arc::clone(&catalog)));
        }

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
            catalog,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Catalog whose registry this server resolves codes with
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, codes = self.catalog.registry().len(), "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
