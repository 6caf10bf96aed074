use serde::Deserialize;

/// One entry of the error code catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeEntry {
    /// Numeric code reported to clients
    pub code: u32,
    /// HTTP status answered for this code
    pub http_status: u16,
    /// Default user-safe message, shown in catalog listings
    #[serde(default)]
    pub message: Option<String>,
}
