use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Failure to substitute a placeholder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// Variable is unset and the placeholder has no default
    #[error("environment variable not found: `{0}`")]
    Missing(String),

    /// Placeholder is not of the form `env.NAME`
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // {{ env.NAME }} or {{ env.NAME | default("value") }}
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Substitute `{{ env.NAME }}` placeholders in raw configuration text
///
/// `{{ env.NAME | default("value") }}` falls back to `value` when `NAME` is
/// unset. Comment lines are left as written.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            output.push_str(&expand_line(line)?);
        }
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, ExpandError> {
    let mut failure = None;

    let expanded = placeholder().replace_all(line, |captures: &Captures<'_>| {
        match resolve(&captures[1], captures.get(2).map(|m| m.as_str())) {
            Ok(value) => value,
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(expanded.into_owned()),
    }
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, ExpandError> {
    let name = key
        .strip_prefix("env.")
        .filter(|name| !name.is_empty() && !name.contains('.'))
        .ok_or_else(|| ExpandError::UnsupportedScope(key.to_string()))?;

    match (std::env::var(name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => Err(ExpandError::Missing(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[registry]\nmin_code = 100000\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_variables() {
        let vars = [("ERRCODE_HOST", Some("0.0.0.0")), ("ERRCODE_PORT", Some("8080"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("listen_address = \"{{ env.ERRCODE_HOST }}:{{env.ERRCODE_PORT}}\"").unwrap();
            assert_eq!(result, "listen_address = \"0.0.0.0:8080\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("ERRCODE_MISSING", || {
            let err = expand_env("log_filter = \"{{ env.ERRCODE_MISSING }}\"").unwrap_err();
            assert_eq!(err, ExpandError::Missing("ERRCODE_MISSING".to_string()));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("ERRCODE_FILTER", || {
            let result = expand_env("log_filter = \"{{ env.ERRCODE_FILTER | default(\"warn\") }}\"").unwrap();
            assert_eq!(result, "log_filter = \"warn\"");
        });

        temp_env::with_var("ERRCODE_FILTER", Some("debug"), || {
            let result = expand_env("log_filter = \"{{ env.ERRCODE_FILTER | default(\"warn\") }}\"").unwrap();
            assert_eq!(result, "log_filter = \"debug\"");
        });
    }

    #[test]
    fn empty_default() {
        temp_env::with_var_unset("ERRCODE_EMPTY", || {
            let result = expand_env("message = \"{{ env.ERRCODE_EMPTY | default(\"\") }}\"").unwrap();
            assert_eq!(result, "message = \"\"");
        });
    }

    #[test]
    fn rejects_other_scopes() {
        let err = expand_env("x = \"{{ secrets.TOKEN }}\"").unwrap_err();
        assert_eq!(err, ExpandError::UnsupportedScope("secrets.TOKEN".to_string()));

        let err = expand_env("x = \"{{ env.A.B }}\"").unwrap_err();
        assert_eq!(err, ExpandError::UnsupportedScope("env.A.B".to_string()));
    }

    #[test]
    fn comments_are_not_expanded() {
        temp_env::with_var_unset("ERRCODE_MISSING", || {
            let input = "  # listen_address = \"{{ env.ERRCODE_MISSING }}\"\n";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
