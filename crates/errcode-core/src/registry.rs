use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use http::StatusCode;
use thiserror::Error;

/// HTTP statuses a code may be mapped to
///
/// Only this curated subset is meaningful for client-facing responses.
pub const SUPPORTED_HTTP_STATUSES: [StatusCode; 10] = [
    StatusCode::BAD_REQUEST,
    StatusCode::UNAUTHORIZED,
    StatusCode::FORBIDDEN,
    StatusCode::NOT_FOUND,
    StatusCode::REQUEST_TIMEOUT,
    StatusCode::CONFLICT,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Smallest code accepted for registration unless configured otherwise
pub const DEFAULT_MIN_CODE: u32 = 100_000;

/// Code reported for the absence of an error
pub const DEFAULT_SUCCESS_CODE: u32 = 200;

/// Whether `status` is in [`SUPPORTED_HTTP_STATUSES`]
pub fn is_supported_http_status(status: StatusCode) -> bool {
    SUPPORTED_HTTP_STATUSES.contains(&status)
}

/// Tunable constants of a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Codes below this floor are reserved for built-in codes
    pub min_code: u32,
    /// Status (and code) reported for unregistered codes and foreign errors
    pub unknown_http_status: StatusCode,
    /// Code reported when there is no error at all
    pub success_code: u32,
}

impl Settings {
    /// Code used by unknown coders, always equal to the unknown HTTP status
    pub fn unknown_code(&self) -> u32 {
        u32::from(self.unknown_http_status.as_u16())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_code: DEFAULT_MIN_CODE,
            unknown_http_status: StatusCode::INTERNAL_SERVER_ERROR,
            success_code: DEFAULT_SUCCESS_CODE,
        }
    }
}

/// Reasons a code cannot be admitted into a registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Code is below the configured floor
    #[error("code must be greater than or equal to {min_code}, got {code}")]
    BelowMinimum { code: u32, min_code: u32 },

    /// Status is not in the allow-list
    #[error("http status ({0}) is not supported")]
    UnsupportedStatus(u16),

    /// Strict registration found an existing mapping
    #[error("code {code} already registered with http status {existing}")]
    AlreadyRegistered { code: u32, existing: u16 },
}

/// Mapping from numeric error codes to HTTP statuses
///
/// All access goes through a single mutex held only for the map operation.
/// A process-wide instance is available through [`Registry::global`];
/// independent instances can be created for tests or embedding.
#[derive(Debug, Default)]
pub struct Registry {
    settings: Settings,
    codes: Mutex<HashMap<u32, StatusCode>>,
}

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

impl Registry {
    /// Create an empty registry with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given settings
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            codes: Mutex::default(),
        }
    }

    /// The process-wide registry
    ///
    /// Initialised with default settings on first use unless
    /// [`Registry::install_global`] ran before.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| Arc::new(Self::new()))
    }

    /// Make `registry` the process-wide registry
    ///
    /// The caller may keep its handle; both refer to the same mappings.
    ///
    /// # Errors
    ///
    /// Gives `registry` back if the global registry was already initialised,
    /// explicitly or by first use
    pub fn install_global(registry: Arc<Self>) -> Result<&'static Self, Arc<Self>> {
        GLOBAL.set(registry)?;
        Ok(Self::global())
    }

    /// Settings this registry resolves codes with
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Map `code` to `status`, replacing any previous mapping
    ///
    /// # Panics
    ///
    /// Panics if `code` is below the configured minimum or `status` is not
    /// supported. Both are programming errors meant to surface at startup.
    #[track_caller]
    pub fn register(&self, code: u32, status: StatusCode) {
        if let Err(e) = self.try_register(code, status) {
            panic!("{e}");
        }
    }

    /// Map `code` to `status`, refusing to replace an existing mapping
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Registry::register`], and when
    /// `code` is already registered. The existing mapping is kept.
    #[track_caller]
    pub fn register_strict(&self, code: u32, status: StatusCode) {
        if let Err(e) = self.try_register_strict(code, status) {
            panic!("{e}");
        }
    }

    /// Fallible form of [`Registry::register`]
    ///
    /// # Errors
    ///
    /// Returns an error if `code` is below the minimum or `status` is not
    /// supported. The registry is left untouched.
    pub fn try_register(&self, code: u32, status: StatusCode) -> Result<(), RegistrationError> {
        self.validate(code, status)?;

        let previous = self.lock().insert(code, status);

        match previous {
            Some(previous) if previous != status => tracing::warn!(
                code,
                previous = previous.as_u16(),
                http_status = status.as_u16(),
                "error code re-registered with a different http status"
            ),
            _ => tracing::debug!(code, http_status = status.as_u16(), "error code registered"),
        }

        Ok(())
    }

    /// Fallible form of [`Registry::register_strict`]
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or `code` is already present
    pub fn try_register_strict(&self, code: u32, status: StatusCode) -> Result<(), RegistrationError> {
        self.validate(code, status)?;

        {
            let mut codes = self.lock();
            if let Some(existing) = codes.get(&code) {
                return Err(RegistrationError::AlreadyRegistered {
                    code,
                    existing: existing.as_u16(),
                });
            }
            codes.insert(code, status);
        }

        tracing::debug!(code, http_status = status.as_u16(), "error code registered");

        Ok(())
    }

    /// HTTP status registered for `code`
    pub fn lookup(&self, code: u32) -> Option<StatusCode> {
        self.lock().get(&code).copied()
    }

    /// Status for `code`, falling back to the unknown status
    pub fn resolve(&self, code: u32) -> StatusCode {
        self.lookup(code).unwrap_or(self.settings.unknown_http_status)
    }

    /// Snapshot of all mappings ordered by code
    pub fn entries(&self) -> Vec<(u32, StatusCode)> {
        let mut entries: Vec<_> = self.lock().iter().map(|(code, status)| (*code, *status)).collect();
        entries.sort_unstable_by_key(|(code, _)| *code);
        entries
    }

    /// Number of registered codes
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no code has been registered
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn validate(&self, code: u32, status: StatusCode) -> Result<(), RegistrationError> {
        if code < self.settings.min_code {
            return Err(RegistrationError::BelowMinimum {
                code,
                min_code: self.settings.min_code,
            });
        }

        if !is_supported_http_status(status) {
            return Err(RegistrationError::UnsupportedStatus(status.as_u16()));
        }

        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u32, StatusCode>> {
        // Every critical section is a single map operation, so a poisoned
        // map is still consistent
        self.codes.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Register `code` in the global registry, see [`Registry::register`]
///
/// # Panics
///
/// Panics if the code or status is invalid
#[track_caller]
pub fn register(code: u32, status: StatusCode) {
    Registry::global().register(code, status);
}

/// Strictly register `code` in the global registry, see [`Registry::register_strict`]
///
/// # Panics
///
/// Panics if the code or status is invalid or the code is taken
#[track_caller]
pub fn register_strict(code: u32, status: StatusCode) {
    Registry::global().register_strict(code, status);
}

/// Look `code` up in the global registry
pub fn lookup(code: u32) -> Option<StatusCode> {
    Registry::global().lookup(code)
}
