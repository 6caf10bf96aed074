use std::collections::HashMap;
use std::sync::Arc;

use errcode_config::Config;
use errcode_core::{Registry, Settings, is_supported_http_status};
use http::StatusCode;
use serde::Serialize;

/// Public description of one error code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeInfo {
    pub code: u32,
    pub http_status: u16,
    pub message: Option<String>,
}

/// Registry populated from the `[[codes]]` configuration
///
/// Keeps the configured default messages next to the registry so the
/// catalog can be published. Codes registered later by application code
/// show up without a message.
pub struct Catalog {
    registry: Arc<Registry>,
    messages: HashMap<u32, String>,
}

impl Catalog {
    /// Build a registry from configuration and register every catalog entry
    ///
    /// # Errors
    ///
    /// Returns an error if the unknown status is not a supported HTTP status
    /// or an entry cannot be registered strictly
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let unknown_http_status = StatusCode::from_u16(config.registry.unknown_http_status)
            .map_err(|e| anyhow::anyhow!("invalid registry.unknown_http_status: {e}"))?;
        if !is_supported_http_status(unknown_http_status) {
            anyhow::bail!(
                "registry.unknown_http_status ({}) is not a supported http status",
                unknown_http_status.as_u16()
            );
        }

        let registry = Registry::with_settings(Settings {
            min_code: config.registry.min_code,
            unknown_http_status,
            success_code: config.registry.success_code,
        });

        let mut messages = HashMap::new();
        for entry in &config.codes {
            let status = StatusCode::from_u16(entry.http_status)
                .map_err(|e| anyhow::anyhow!("invalid http status for code {}: {e}", entry.code))?;

            registry
                .try_register_strict(entry.code, status)
                .map_err(|e| anyhow::anyhow!("failed to register code {}: {e}", entry.code))?;

            if let Some(ref message) = entry.message {
                messages.insert(entry.code, message.clone());
            }
        }

        tracing::info!(codes = registry.len(), "error code catalog loaded");

        Ok(Self {
            registry: Arc::new(registry),
            messages,
        })
    }

    /// Registry backing this catalog
    pub const fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Make this catalog's registry the process-wide registry
    ///
    /// # Errors
    ///
    /// Returns an error if the global registry was already initialised
    pub fn install_global(&self) -> anyhow::Result<()> {
        Registry::install_global(Arc::clone(&self.registry))
            .map_err(|_| anyhow::anyhow!("the global error code registry is already initialised"))?;
        Ok(())
    }

    /// Every registered code, ordered by code
    pub fn entries(&self) -> Vec<CodeInfo> {
        self.registry
            .entries()
            .into_iter()
            .map(|(code, status)| self.info(code, status))
            .collect()
    }

    /// Description of `code`, if registered
    pub fn get(&self, code: u32) -> Option<CodeInfo> {
        self.registry.lookup(code).map(|status| self.info(code, status))
    }

    fn info(&self, code: u32, status: StatusCode) -> CodeInfo {
        CodeInfo {
            code,
            http_status: status.as_u16(),
            message: self.messages.get(&code).cloned(),
        }
    }
}
