//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Errors surfaced to HTTP clients
///
/// Unknown users are not errors and never reach this type.
#[derive(Debug)]
pub enum ApiError {
    /// User directory could not be parsed
    Directory(String),
    /// A data source could not be read
    Io(String),
    Internal(String),
}

impl From<presence_common::Error> for ApiError {
    fn from(err: presence_common::Error) -> Self {
        use presence_common::Error;

        match err {
            Error::Directory(e) => ApiError::Directory(e.to_string()),
            Error::Io(e) => ApiError::Io(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::Directory(msg) => format!("Directory parse error: {}", msg),
            ApiError::Io(msg) => format!("Data source error: {}", msg),
            ApiError::Internal(msg) => format!("Internal error: {}", msg),
        };

        error!("{}", message);

        let body = Json(json!({
            "error": message,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
