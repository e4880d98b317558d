//! Error types for the service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::request::ValidationErrors;

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

/// Startup errors: configuration, rules, and binding.
#[derive(Error, Debug)]
pub enum Error {
    #[error("config: {0}")]
    Config(String),

    #[error("rules: {0}")]
    Rules(#[from] suggest_intent::RuleError),

    #[error("resilience: {0}")]
    Resilience(#[from] suggest_resilience::Error),

    #[error("invalid listen address {addr:?}: {source}")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-level failures, rendered as HTTP responses.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body is not the expected JSON.
    #[error("{0}")]
    BadRequest(String),

    /// One or more fields failed validation.
    #[error("one or more validation errors occurred")]
    Validation(ValidationErrors),

    /// `X-Failure-Probability` header is unusable.
    #[error("invalid {header} header: {source}")]
    BadHeader {
        header: &'static str,
        #[source]
        source: suggest_resilience::Error,
    },

    /// Every attempt to reach the dependency failed.
    #[error("dependency unavailable")]
    DependencyUnavailable { attempts: u32 },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "title": "One or more validation errors occurred.",
                    "status": StatusCode::BAD_REQUEST.as_u16(),
                    "errors": errors,
                })),
            )
                .into_response(),
            ApiError::BadRequest(_) | ApiError::BadHeader { .. } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            ApiError::DependencyUnavailable { attempts } => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": self.to_string(), "attempts": attempts })),
            )
                .into_response(),
        }
    }
}
