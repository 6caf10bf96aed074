use std::collections::HashSet;
use std::path::Path;

use errcode_core::http::StatusCode;
use errcode_core::is_supported_http_status;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the unknown status is unsupported or a catalog
    /// entry could not be registered
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_registry()?;
        self.validate_codes()?;
        Ok(())
    }

    fn validate_registry(&self) -> anyhow::Result<()> {
        let status = self.registry.unknown_http_status;
        if !supported(status) {
            anyhow::bail!("registry.unknown_http_status ({status}) is not a supported http status");
        }

        Ok(())
    }

    /// Catalog entries must be registrable and unique
    fn validate_codes(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::with_capacity(self.codes.len());

        for entry in &self.codes {
            if entry.code < self.registry.min_code {
                anyhow::bail!(
                    "code {} is below registry.min_code ({})",
                    entry.code,
                    self.registry.min_code
                );
            }

            if !supported(entry.http_status) {
                anyhow::bail!(
                    "code {} maps to unsupported http status {}",
                    entry.code,
                    entry.http_status
                );
            }

            if !seen.insert(entry.code) {
                anyhow::bail!("code {} is declared more than once", entry.code);
            }
        }

        Ok(())
    }
}

fn supported(status: u16) -> bool {
    StatusCode::from_u16(status).is_ok_and(is_supported_http_status)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::{CodeEntry, Config, LogFormat};

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.registry.min_code, 100_000);
        assert_eq!(config.registry.unknown_http_status, 500);
        assert_eq!(config.registry.success_code, 200);
        assert!(config.server.health.enabled);
        assert_eq!(config.server.health.path, "/health");
        assert!(config.server.catalog);
        assert_eq!(config.telemetry.log_filter, "info");
        assert_eq!(config.telemetry.format, LogFormat::Text);
        assert!(config.codes.is_empty());
    }

    #[test]
    fn full_config() {
        let config = Config::parse(
            r#"
            [registry]
            min_code = 1000
            unknown_http_status = 503

            [server]
            listen_address = "127.0.0.1:4000"
            catalog = false

            [server.health]
            path = "/healthz"

            [telemetry]
            log_filter = "errcode=debug"
            format = "json"

            [[codes]]
            code = 1001
            http_status = 404
            message = "user not found"

            [[codes]]
            code = 1002
            http_status = 409
            "#,
        )
        .unwrap();

        assert_eq!(config.registry.min_code, 1000);
        assert_eq!(config.registry.unknown_http_status, 503);
        assert_eq!(config.server.listen_address, Some("127.0.0.1:4000".parse().unwrap()));
        assert!(!config.server.catalog);
        assert_eq!(config.server.health.path, "/healthz");
        assert_eq!(config.telemetry.format, LogFormat::Json);
        assert_eq!(
            config.codes,
            vec![
                CodeEntry {
                    code: 1001,
                    http_status: 404,
                    message: Some("user not found".to_string()),
                },
                CodeEntry {
                    code: 1002,
                    http_status: 409,
                    message: None,
                },
            ]
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Config::parse("[registry]\nmax_code = 5\n").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn rejects_code_below_minimum() {
        let err = Config::parse("[[codes]]\ncode = 99\nhttp_status = 400\n").unwrap_err();
        assert_eq!(err.to_string(), "code 99 is below registry.min_code (100000)");
    }

    #[test]
    fn rejects_unsupported_status() {
        let err = Config::parse("[[codes]]\ncode = 100001\nhttp_status = 418\n").unwrap_err();
        assert_eq!(err.to_string(), "code 100001 maps to unsupported http status 418");

        let err = Config::parse("[[codes]]\ncode = 100001\nhttp_status = 1000\n").unwrap_err();
        assert!(err.to_string().contains("unsupported http status 1000"));
    }

    #[test]
    fn rejects_duplicate_codes() {
        let err = Config::parse(
            "[[codes]]\ncode = 100001\nhttp_status = 400\n\n[[codes]]\ncode = 100001\nhttp_status = 404\n",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "code 100001 is declared more than once");
    }

    #[test]
    fn rejects_unsupported_unknown_status() {
        let err = Config::parse("[registry]\nunknown_http_status = 502\n").unwrap_err();
        assert!(err.to_string().contains("unknown_http_status (502)"));
    }

    #[test]
    fn load_expands_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[telemetry]
log_filter = "{{{{ env.ERRCODE_TEST_FILTER | default("warn") }}}}""#
        )
        .unwrap();

        temp_env::with_var("ERRCODE_TEST_FILTER", Some("trace"), || {
            let config = Config::load(file.path()).unwrap();
            assert_eq!(config.telemetry.log_filter, "trace");
        });
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(std::path::Path::new("/nonexistent/errcode.toml")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read config file /nonexistent/errcode.toml"));
    }
}
