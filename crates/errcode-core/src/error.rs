use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;

use crate::coder::{Coder, DefaultCoder};
use crate::registry::{Registry, RegistrationError, is_supported_http_status};
use crate::stack::Stack;

/// Alias for a type-erased, thread-safe error
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// How much of an error to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// The user-safe message only
    #[default]
    Brief,
    /// The full cause chain with codes and stacks, for operators and logs
    Verbose,
}

/// An error annotated with a code, an HTTP status and a stack
///
/// `Display` only ever shows [`Coder::message`], so a `WithCode` can be
/// rendered to clients as-is. The wrapped cause is reachable through
/// [`std::error::Error::source`] and the diagnostic view through
/// [`WithCode::render`] with [`RenderMode::Verbose`].
pub struct WithCode {
    coder: DefaultCoder,
    cause: Option<BoxError>,
    stack: Stack,
}

impl WithCode {
    /// Create an error for `code`, resolved through the global registry
    #[track_caller]
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Registry::global().with_code(code, message)
    }

    /// Create an error for `code` with a formatted message
    ///
    /// Usually invoked through the [`with_code!`](crate::with_code) macro.
    #[track_caller]
    pub fn new_fmt(code: u32, args: fmt::Arguments<'_>) -> Self {
        Registry::global().with_code_fmt(code, args)
    }

    #[track_caller]
    pub(crate) fn from_parts(coder: DefaultCoder, cause: Option<BoxError>) -> Self {
        Self {
            coder,
            cause,
            stack: Stack::capture(),
        }
    }

    /// The coder carrying code, status and message
    pub const fn coder(&self) -> &DefaultCoder {
        &self.coder
    }

    /// The wrapped error, if any
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Stack captured when this error was created
    pub const fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Render according to `mode`
    ///
    /// [`RenderMode::Verbose`] walks the cause chain from the root cause to
    /// this error. Every annotated level prints `message (code)` followed by
    /// its own stack; foreign errors print their display string.
    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Brief => self.coder.message().to_string(),
            RenderMode::Verbose => {
                let mut out = String::new();
                if let Some(cause) = self.cause.as_deref() {
                    render_cause(cause, &mut out);
                    out.push('\n');
                }
                out.push_str(&format!("{} ({}){}", self.coder.message(), self.coder.code(), self.stack));
                out
            }
        }
    }
}

/// Append the verbose rendering of `err` and everything below it
fn render_cause(err: &(dyn StdError + 'static), out: &mut String) {
    if let Some(annotated) = err.downcast_ref::<WithCode>() {
        out.push_str(&annotated.render(RenderMode::Verbose));
        return;
    }

    if let Some(source) = err.source() {
        render_cause(source, out);
        out.push('\n');
    }
    out.push_str(&err.to_string());
}

impl Coder for WithCode {
    fn http_status(&self) -> StatusCode {
        self.coder.http_status()
    }

    fn code(&self) -> u32 {
        self.coder.code()
    }

    fn message(&self) -> &str {
        self.coder.message()
    }
}

impl fmt::Display for WithCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.coder.message())
    }
}

impl fmt::Debug for WithCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithCode")
            .field("code", &self.coder.code())
            .field("http_status", &self.coder.http_status().as_u16())
            .field("message", &self.coder.message())
            .field("cause", &self.cause)
            .finish_non_exhaustive()
    }
}

impl StdError for WithCode {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn StdError + 'static))
    }
}

impl Registry {
    /// Create an error for `code` resolved through this registry
    #[track_caller]
    pub fn with_code(&self, code: u32, message: impl Into<String>) -> WithCode {
        WithCode::from_parts(DefaultCoder::registered(self, code, message), None)
    }

    /// Create an error for `code` with a formatted message
    #[track_caller]
    pub fn with_code_fmt(&self, code: u32, args: fmt::Arguments<'_>) -> WithCode {
        self.with_code(code, fmt::format(args))
    }

    /// Wrap `cause` with `code` and `message`
    ///
    /// Returns `None` when there is no cause. The stack is captured here,
    /// not where `cause` was created.
    #[track_caller]
    pub fn wrap_code<E>(&self, cause: Option<E>, code: u32, message: impl Into<String>) -> Option<WithCode>
    where
        E: Into<BoxError>,
    {
        let cause = cause?;
        Some(WithCode::from_parts(
            DefaultCoder::registered(self, code, message),
            Some(cause.into()),
        ))
    }

    /// Wrap `cause` with `code` and a formatted message
    ///
    /// Returns `None` when there is no cause, without formatting.
    #[track_caller]
    pub fn wrap_code_fmt<E>(&self, cause: Option<E>, code: u32, args: fmt::Arguments<'_>) -> Option<WithCode>
    where
        E: Into<BoxError>,
    {
        let cause = cause?;
        Some(WithCode::from_parts(
            DefaultCoder::registered(self, code, fmt::format(args)),
            Some(cause.into()),
        ))
    }
}

/// Create an error for `code`, resolved through the global registry
#[track_caller]
pub fn with_code(code: u32, message: impl Into<String>) -> WithCode {
    WithCode::new(code, message)
}

/// Wrap `cause` with `code` and `message` using the global registry
///
/// Wrapping no error yields no error.
#[track_caller]
pub fn wrap_code<E>(cause: Option<E>, code: u32, message: impl Into<String>) -> Option<WithCode>
where
    E: Into<BoxError>,
{
    Registry::global().wrap_code(cause, code, message)
}

#[doc(hidden)]
#[track_caller]
pub fn wrap_code_fmt<E>(cause: Option<E>, code: u32, args: fmt::Arguments<'_>) -> Option<WithCode>
where
    E: Into<BoxError>,
{
    Registry::global().wrap_code_fmt(cause, code, args)
}

/// Create an error whose code is the HTTP status itself
///
/// Bypasses the registry.
///
/// # Panics
///
/// Panics if `status` is not a supported HTTP status
#[track_caller]
pub fn new_http_code(status: StatusCode, message: impl Into<String>) -> WithCode {
    match try_new_http_code(status, message) {
        Ok(err) => err,
        Err(e) => panic!("{e}"),
    }
}

/// Fallible form of [`new_http_code`]
///
/// # Errors
///
/// Returns [`RegistrationError::UnsupportedStatus`] if `status` is not a
/// supported HTTP status
#[track_caller]
pub fn try_new_http_code(status: StatusCode, message: impl Into<String>) -> Result<WithCode, RegistrationError> {
    if !is_supported_http_status(status) {
        return Err(RegistrationError::UnsupportedStatus(status.as_u16()));
    }

    Ok(WithCode::from_parts(DefaultCoder::http(status, message), None))
}

/// Annotate the error of a [`Result`] with a code
pub trait ResultExt<T> {
    /// Wrap the error with `code` and `message`, passing `Ok` through
    ///
    /// # Errors
    ///
    /// Returns the annotated error if `self` is an error
    fn wrap_code(self, code: u32, message: impl Into<String>) -> Result<T, WithCode>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[track_caller]
    fn wrap_code(self, code: u32, message: impl Into<String>) -> Result<T, WithCode> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(WithCode::from_parts(
                DefaultCoder::registered(Registry::global(), code, message),
                Some(e.into()),
            )),
        }
    }
}

/// Create a [`WithCode`] with a formatted message
///
/// ```
/// use errcode_core::with_code;
///
/// let err = with_code!(100_404, "user {} not found", 42);
/// assert_eq!(err.to_string(), "user 42 not found");
/// ```
#[macro_export]
macro_rules! with_code {
    ($code:expr, $($arg:tt)+) => {
        $crate::WithCode::new_fmt($code, ::std::format_args!($($arg)+))
    };
}

/// Wrap an optional cause with a code and a formatted message
///
/// Evaluates to `None` when the cause is `None`.
#[macro_export]
macro_rules! wrap_code {
    ($cause:expr, $code:expr, $($arg:tt)+) => {
        $crate::wrap_code_fmt($cause, $code, ::std::format_args!($($arg)+))
    };
}
