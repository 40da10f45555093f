//! Response construction.
//!
//! # Responsibilities
//! - Render a resolved endpoint (status, JSON body)
//! - Build canonical redirects
//! - Build error responses for failed resolutions

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::routing::Resolution;
use crate::tree::Handler;

/// Serve a resolved endpoint.
pub fn served(resolution: &Resolution<Handler>) -> Response {
    let endpoint = &resolution.handler;
    let status = StatusCode::from_u16(endpoint.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = json!({
        "handler": endpoint.name,
        "remainder": resolution.remainder,
        "body": endpoint.body,
    });
    (status, Json(body)).into_response()
}

/// Redirect to `location` with `status`; falls back to 302 for a
/// non-redirect code.
pub fn redirect(location: &str, status: u16) -> Response {
    let status = StatusCode::from_u16(status)
        .ok()
        .filter(StatusCode::is_redirection)
        .unwrap_or(StatusCode::FOUND);
    (status, [(header::LOCATION, location.to_string())]).into_response()
}

/// JSON error body.
pub fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}
