use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("{0}")]
    #[diagnostic(code(gigboard::validation))]
    Validation(String),

    #[error("Failed to fetch image from {url}: {reason}")]
    #[diagnostic(code(gigboard::upstream_fetch))]
    UpstreamFetch { url: String, reason: String },

    #[error("{service} rejected the upload: {reason}")]
    #[diagnostic(code(gigboard::upstream_rejected))]
    UpstreamRejected { service: String, reason: String },

    #[error("Storage error: {0}")]
    #[diagnostic(code(gigboard::storage))]
    Storage(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(gigboard::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(gigboard::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(gigboard::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(gigboard::serialization))]
    Serialization(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl Error {
    /// HTTP status the error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamFetch { .. } | Error::UpstreamRejected { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing or invalid environment variable: {}", var))
}

/// Helper to create storage errors
pub fn storage_error(message: &str) -> Error {
    Error::Storage(message.to_string())
}

/// Helper to create soft-failure errors for a hosting service
pub fn rejected(service: impl ToString, reason: impl ToString) -> Error {
    Error::UpstreamRejected {
        service: service.to_string(),
        reason: reason.to_string(),
    }
}
