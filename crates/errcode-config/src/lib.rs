#![allow(clippy::must_use_candidate)]

pub mod codes;
mod env;
mod loader;
pub mod registry;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use codes::CodeEntry;
pub use env::ExpandError;
pub use registry::RegistryConfig;
pub use server::{HealthConfig, ServerConfig};
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level errcode configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Registry constants
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Error code catalog registered at startup
    #[serde(default)]
    pub codes: Vec<CodeEntry>,
}
