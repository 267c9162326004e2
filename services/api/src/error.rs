//! services/api/src/error.rs
//!
//! Defines the error types for the API service: `ApiError` for process startup,
//! and `ServiceError` for request handling, which renders into the JSON envelope.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mentorsphere_core::ports::PortError;
use mentorsphere_core::settings::SettingsError;
use serde::Serialize;
use tracing::error;

/// The primary error type for starting the `api` service.
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

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

//=========================================================================================
// Request errors
//=========================================================================================

/// Errors a domain operation can report to a caller.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => Self::NotFound(format!("Not found: {}", what)),
            PortError::Conflict(what) => Self::BadRequest(what),
            PortError::Rejected(what) => Self::BadRequest(what),
            other => {
                error!("Storage failure: {}", other);
                Self::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<SettingsError> for ServiceError {
    fn from(err: SettingsError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

//=========================================================================================
// Response envelope
//=========================================================================================

/// Every response body: `{success, message?, data?, error?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        })
    }

    pub fn with_message(message: impl Into<String>, data: Option<T>) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data,
            error: None,
        })
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Self::with_message(message, None)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Envelope::<()> {
            success: false,
            message: None,
            data: None,
            error: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
