//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use castscript_error::{CastscriptError, CastscriptErrorKind, PipelineErrorKind};
use serde_json::json;

/// An error returned to the client as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a failure to a response.
    ///
    /// Input problems become 400 with their own message. Anything else is
    /// logged and reported as 500 with `fallback`, so internal details stay
    /// server-side.
    pub fn from_error(err: CastscriptError, fallback: &str) -> Self {
        if is_client_error(&err) {
            return Self::bad_request(err.user_message());
        }
        tracing::error!(error = %err, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, fallback)
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message sent in the body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn is_client_error(err: &CastscriptError) -> bool {
    match err.kind() {
        CastscriptErrorKind::Validation(_) => true,
        CastscriptErrorKind::Pipeline(e) => matches!(
            e.kind,
            PipelineErrorKind::UnknownProfile(_) | PipelineErrorKind::InvalidProfile { .. }
        ),
        _ => false,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
