use std::error::Error as StdError;

use axum::Json;
use axum::response::{IntoResponse, Response};
use errcode_core::{Coder, Registry, RenderMode, WithCode};
use http::StatusCode;
use serde::Serialize;

/// JSON envelope returned by every endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    /// Success code or the error's code
    pub code: u32,
    /// Empty on success, the user-safe error message otherwise
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope around `data`
    pub const fn success(code: u32, data: T) -> Self {
        Self {
            code,
            message: String::new(),
            data: Some(data),
        }
    }

    /// Envelope describing `coder`
    pub fn failure(coder: &impl Coder) -> Self {
        Self {
            code: coder.code(),
            message: coder.message().to_string(),
            data: None,
        }
    }
}

/// Turn a handler outcome into a status and envelope
///
/// Errors without a code of their own are reported with the registry's
/// unknown status and code, see [`Registry::coder_of`]. The full
/// diagnostic chain goes to the log only.
pub fn make_response<T>(registry: &Registry, result: Result<T, &(dyn StdError + 'static)>) -> (StatusCode, ApiResponse<T>) {
    match result {
        Ok(data) => (StatusCode::OK, ApiResponse::success(registry.settings().success_code, data)),
        Err(err) => {
            let coder = registry.coder_of(err);
            log_error(err, coder.http_status(), coder.code());
            (coder.http_status(), ApiResponse::failure(&coder))
        }
    }
}

/// Log an error that is about to be answered
///
/// Server errors carry the verbose rendering, client errors only the message.
fn log_error(err: &(dyn StdError + 'static), status: StatusCode, code: u32) {
    if status.is_server_error() {
        let diagnostic = err
            .downcast_ref::<WithCode>()
            .map_or_else(|| err.to_string(), |annotated| annotated.render(RenderMode::Verbose));
        tracing::error!(code, http_status = status.as_u16(), error = %diagnostic, "request failed");
    } else {
        tracing::debug!(code, http_status = status.as_u16(), error = %err, "request rejected");
    }
}

/// Handler error rendered as a JSON envelope
///
/// The response body never contains the cause or the stack.
#[derive(Debug)]
pub struct ErrorResponse(pub WithCode);

impl From<WithCode> for ErrorResponse {
    fn from(err: WithCode) -> Self {
        Self(err)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.0.http_status();
        log_error(&self.0, status, self.0.code());

        let body: ApiResponse<()> = ApiResponse::failure(&self.0);
        (status, Json(body)).into_response()
    }
}
