//! Test server wrapper that starts errcode on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use errcode_config::Config;
use errcode_core::Registry;
use errcode_server::Server;
use tokio_util::sync::CancellationToken;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        Self::start_with(config, |_| Router::new()).await
    }

    /// Start a test server with extra application routes
    ///
    /// The routes are built against the catalog's registry, the way an
    /// application would resolve its own handler errors.
    /// Binds to port 0 for automatic port assignment.
    pub async fn start_with(config: Config, routes: impl FnOnce(Arc<Registry>) -> Router) -> anyhow::Result<Self> {
        let server = Server::new(&config)?;
        let extra = routes(Arc::clone(server.catalog().registry()));
        let router = server.into_router().merge(extra);

        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self { addr, shutdown, client })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Fetch `path` and decode the JSON envelope
    pub async fn get_json(&self, path: &str) -> (u16, serde_json::Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
