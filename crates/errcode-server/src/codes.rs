use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;
use errcode_core::new_http_code;
use http::StatusCode;

use crate::catalog::{Catalog, CodeInfo};
use crate::response::{ApiResponse, ErrorResponse};

/// Routes publishing the error code catalog
pub fn codes_router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/v1/codes", get(list_codes))
        .route("/v1/codes/{code}", get(get_code))
        .with_state(catalog)
}

/// Handle `GET /v1/codes`
async fn list_codes(State(catalog): State<Arc<Catalog>>) -> Json<ApiResponse<Vec<CodeInfo>>> {
    let success_code = catalog.registry().settings().success_code;
    Json(ApiResponse::success(success_code, catalog.entries()))
}

/// Handle `GET /v1/codes/{code}`
async fn get_code(
    State(catalog): State<Arc<Catalog>>,
    Path(raw): Path<String>,
) -> Result<Json<ApiResponse<CodeInfo>>, ErrorResponse> {
    let code: u32 = raw
        .parse()
        .map_err(|_| new_http_code(StatusCode::BAD_REQUEST, format!("invalid error code: {raw}")))?;

    let info = catalog
        .get(code)
        .ok_or_else(|| new_http_code(StatusCode::NOT_FOUND, format!("error code {code} is not registered")))?;

    let success_code = catalog.registry().settings().success_code;
    Ok(Json(ApiResponse::success(success_code, info)))
}
