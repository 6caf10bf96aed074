//! Coded errors for HTTP services
//!
//! Annotates failures with a stable numeric code, a user-safe message, an
//! HTTP status and a captured stack, while keeping the original error as the
//! [`source`](std::error::Error::source) for diagnostics.
//!
//! Codes are mapped to HTTP statuses through a [`Registry`]. Service code
//! builds [`WithCode`] errors; response builders turn any error into a
//! [`Coder`] with [`parse_coder`].
//!
//! ```
//! use std::io;
//!
//! use errcode_core::{Coder, Registry, RenderMode, http::StatusCode};
//!
//! let registry = Registry::new();
//! registry.register(100_404, StatusCode::NOT_FOUND);
//!
//! let cause = io::Error::other("no row for id 42");
//! let err = registry.wrap_code(Some(cause), 100_404, "user not found").unwrap();
//!
//! assert_eq!(err.to_string(), "user not found");
//! assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
//! assert!(err.render(RenderMode::Verbose).contains("no row for id 42"));
//! ```

#![allow(clippy::must_use_candidate)]

mod coder;
pub mod error;
mod parse;
mod registry;
mod stack;

pub use http;

pub use coder::{Coder, DefaultCoder};
#[doc(hidden)]
pub use error::wrap_code_fmt;
pub use error::{BoxError, RenderMode, ResultExt, WithCode, new_http_code, try_new_http_code, with_code, wrap_code};
pub use parse::{code_of, is_http_status, parse_coder};
pub use registry::{
    DEFAULT_MIN_CODE, DEFAULT_SUCCESS_CODE, RegistrationError, Registry, SUPPORTED_HTTP_STATUSES, Settings,
    is_supported_http_status, lookup, register, register_strict,
};
pub use stack::Stack;
