//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, info};

/// definitions for the sleepcaster application.
#[derive(Debug)]
pub enum SleepcasterError {
    /// When the request body is missing the required field
    BadRequest(String),
    /// When the image provider (or a fallback fetch) fails
    Provider(String),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl std::fmt::Display for SleepcasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SleepcasterError::BadRequest(message) => write!(f, "Bad request: {message}"),
            SleepcasterError::Provider(message) => write!(f, "Provider error: {message}"),
            SleepcasterError::InternalServerError(message) => {
                write!(f, "Internal server error: {message}")
            }
        }
    }
}

impl std::error::Error for SleepcasterError {}

impl From<reqwest::Error> for SleepcasterError {
    fn from(err: reqwest::Error) -> Self {
        SleepcasterError::Provider(err.to_string())
    }
}

impl From<serde_json::Error> for SleepcasterError {
    fn from(err: serde_json::Error) -> Self {
        SleepcasterError::InternalServerError(err.to_string())
    }
}

impl From<std::io::Error> for SleepcasterError {
    fn from(err: std::io::Error) -> Self {
        SleepcasterError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for SleepcasterError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            SleepcasterError::BadRequest(message) => {
                info!("Bad request received: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            SleepcasterError::Provider(message) => {
                error!("Provider error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            SleepcasterError::InternalServerError(message) => {
                error!("Internal server error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
