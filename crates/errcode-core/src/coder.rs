use http::StatusCode;

use crate::registry::Registry;

/// User-facing identity of an error
///
/// Implementors expose a stable numeric code, the HTTP status to answer
/// with, and a message that is safe to show to API consumers.
///
/// [`Registry::parse_coder`], [`Registry::code_of`] and the response glue
/// only recognize [`WithCode`](crate::WithCode) errors. Other error types
/// implementing this trait are treated as errors without a code; wrap them
/// with [`wrap_code`](crate::wrap_code) to keep their code.
pub trait Coder {
    /// HTTP status for this error
    fn http_status(&self) -> StatusCode;

    /// Stable numeric error code
    fn code(&self) -> u32;

    /// Message safe to expose to API consumers
    ///
    /// Never contains a stack trace or the text of wrapped errors.
    fn message(&self) -> &str;
}

/// Plain [`Coder`] value with immutable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultCoder {
    http_status: StatusCode,
    code: u32,
    message: String,
}

impl DefaultCoder {
    /// Coder whose status is resolved through `registry`
    ///
    /// Unregistered codes get the registry's unknown status.
    pub fn registered(registry: &Registry, code: u32, message: impl Into<String>) -> Self {
        Self {
            http_status: registry.resolve(code),
            code,
            message: message.into(),
        }
    }

    /// Coder that uses `status` as both status and code
    ///
    /// The caller is responsible for checking the status against the
    /// allow-list.
    pub(crate) fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            http_status: status,
            code: u32::from(status.as_u16()),
            message: message.into(),
        }
    }

    /// Coder for errors that carry no code of their own
    pub fn unknown(registry: &Registry, message: impl Into<String>) -> Self {
        let settings = registry.settings();
        Self {
            http_status: settings.unknown_http_status,
            code: settings.unknown_code(),
            message: message.into(),
        }
    }
}

impl Coder for DefaultCoder {
    fn http_status(&self) -> StatusCode {
        self.http_status
    }

    fn code(&self) -> u32 {
        self.code
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl<C: Coder + ToOwned + ?Sized> Coder for std::borrow::Cow<'_, C> {
    fn http_status(&self) -> StatusCode {
        (**self).http_status()
    }

    fn code(&self) -> u32 {
        (**self).code()
    }

    fn message(&self) -> &str {
        (**self).message()
    }
}
