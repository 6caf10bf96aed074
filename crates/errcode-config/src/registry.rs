use serde::Deserialize;

/// Registry constants
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Smallest registrable code
    #[serde(default = "default_min_code")]
    pub min_code: u32,
    /// Status answered for unknown codes and errors without a code
    #[serde(default = "default_unknown_http_status")]
    pub unknown_http_status: u16,
    /// Code reported for successful responses
    #[serde(default = "default_success_code")]
    pub success_code: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_code: default_min_code(),
            unknown_http_status: default_unknown_http_status(),
            success_code: default_success_code(),
        }
    }
}

const fn default_min_code() -> u32 {
    errcode_core::DEFAULT_MIN_CODE
}

const fn default_unknown_http_status() -> u16 {
    500
}

const fn default_success_code() -> u32 {
    errcode_core::DEFAULT_SUCCESS_CODE
}
