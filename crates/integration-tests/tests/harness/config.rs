//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use errcode_config::{CodeEntry, Config, HealthConfig, RegistryConfig, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Add a catalog entry
    pub fn with_code(mut self, code: u32, http_status: u16, message: Option<&str>) -> Self {
        self.config.codes.push(CodeEntry {
            code,
            http_status,
            message: message.map(str::to_owned),
        });
        self
    }

    /// Set registry constants
    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.config.registry = registry;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Disable the code catalog endpoints
    pub fn without_catalog(mut self) -> Self {
        self.config.server.catalog = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
