//! Error-to-response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelstack_error::{ReelstackError, ReelstackErrorKind};
use serde_json::json;
use tracing::warn;

/// Wrapper turning a `ReelstackError` into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ReelstackError);

impl From<ReelstackError> for ApiError {
    fn from(err: ReelstackError) -> Self {
        Self(err)
    }
}

fn status_for(kind: &ReelstackErrorKind) -> StatusCode {
    match kind {
        ReelstackErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
        ReelstackErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
        ReelstackErrorKind::NotInFeed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReelstackErrorKind::Provider(_) => StatusCode::BAD_GATEWAY,
        // Config, database, and transport errors are all server-side.
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("error"),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
