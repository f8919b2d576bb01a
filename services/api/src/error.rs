//! services/api/src/error.rs
//!
//! Defines the error types for the API service: `ApiError` for startup and
//! serving failures, and `RouteError` for failures inside a request handler.

use crate::cache::{apply_cache_headers, CacheOptions};
use crate::config::ConfigError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use interview_prep_core::ports::PortError;
use interview_prep_core::validation::ValidationError;
use serde::Serialize;
use tracing::{error, warn};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure to apply the embedded schema migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// A request-level failure, rendered as the `{ success: false, ... }` envelope.
///
/// Every variant is sent with caching disabled.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// A store failure. `context` becomes the public message and the store's
    /// own message is surfaced in the `error` field.
    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: PortError,
    },

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    /// A local file could not be written.
    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

impl RouteError {
    /// Wraps a store failure with a description of what was being attempted.
    pub fn store(context: impl Into<String>) -> impl FnOnce(PortError) -> RouteError {
        let context = context.into();
        move |source| RouteError::Store { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::Validation(_) => StatusCode::BAD_REQUEST,
            RouteError::NotFound(_) => StatusCode::NOT_FOUND,
            RouteError::Conflict(_) => StatusCode::CONFLICT,
            RouteError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            RouteError::Store { .. } | RouteError::Encode(_) | RouteError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationError> for RouteError {
    fn from(err: ValidationError) -> Self {
        RouteError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for RouteError {
    fn from(rejection: JsonRejection) -> Self {
        RouteError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            RouteError::Store { context, source } => {
                error!("{context}: {source:?}");
                ErrorBody {
                    success: false,
                    message: context,
                    error: Some(source.to_string()),
                }
            }
            RouteError::Encode(e) => {
                error!("Failed to encode response: {e:?}");
                ErrorBody {
                    success: false,
                    message: "Failed to encode response".to_string(),
                    error: Some(e.to_string()),
                }
            }
            RouteError::Io(e) => {
                error!("Failed to store file: {e:?}");
                ErrorBody {
                    success: false,
                    message: "Failed to store file".to_string(),
                    error: Some(e.to_string()),
                }
            }
            other => {
                warn!("Rejected request ({}): {}", status.as_u16(), other);
                ErrorBody {
                    success: false,
                    message: other.to_string(),
                    error: None,
                }
            }
        };

        let bytes = serde_json::to_vec(&body).unwrap_or_default();
        let mut response = (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            bytes.clone(),
        )
            .into_response();
        apply_cache_headers(response.headers_mut(), &CacheOptions::none(), &bytes);
        response
    }
}
