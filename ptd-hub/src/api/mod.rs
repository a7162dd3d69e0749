//! HTTP API handlers for ptd-hub

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub mod health;
pub mod history;
pub mod overview;
pub mod programs;
pub mod session;
pub mod sse;

pub use health::health_routes;
pub use history::list_history;
pub use overview::overview;
pub use programs::{create_program, list_programs, update_program};
pub use session::session_middleware;
pub use sse::event_stream;

/// Error envelope returned by every API handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }
}

impl From<ptd_common::Error> for ApiError {
    fn from(error: ptd_common::Error) -> Self {
        use ptd_common::Error;
        let status = match &error {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
