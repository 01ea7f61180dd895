//! Error types shared across layers.
//!
//! Domain components return typed errors ([`RepositoryError`], [`GenerationError`])
//! that callers inspect by variant. HTTP handlers collapse them into [`AppError`],
//! which renders a JSON body and never leaks backend detail to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Boxed error carried by [`RepositoryError::Backend`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message returned for every unresolvable short link.
pub const LINK_NOT_FOUND_MESSAGE: &str = "Link not found";

/// Message returned for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Failures of the persistence contract.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No mapping matches the requested token or id.
    #[error("no mapping matches {0}")]
    NotFound(String),

    /// The token is already taken by another mapping.
    #[error("token {0} already exists")]
    DuplicateToken(String),

    /// The backend connection has not been established, or was torn down.
    #[error("repository is not initialized")]
    NotInitialized,

    /// Lower-level I/O or driver failure.
    #[error("backend failure during {operation}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl RepositoryError {
    /// Wraps a driver error raised while performing `operation`.
    pub fn backend(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Backend {
            operation,
            source: source.into(),
        }
    }
}

/// Failure to produce a new token.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    details: Value,
}

/// Client-facing error returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// The generic 404 used for unknown or missing tokens.
    pub fn link_not_found() -> Self {
        Self::not_found(LINK_NOT_FOUND_MESSAGE, Value::Null)
    }

    /// The generic 500 used once the failure has been logged.
    pub fn internal_error() -> Self {
        Self::internal(INTERNAL_ERROR_MESSAGE, Value::Null)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => AppError::link_not_found(),
            other => {
                tracing::error!(error = ?other, "repository operation failed");
                AppError::internal_error()
            }
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        tracing::error!(error = ?err, "token generation failed");
        AppError::internal_error()
    }
}

/// Builds the `details` payload for a rejected URL submission.
pub fn invalid_url_details(raw_url: &str) -> Value {
    json!({ "url": raw_url })
}
