//! Server error types and the HTTP boundary handler
//!
//! Services return the typed kinds (not found, validation, unauthorized,
//! forbidden, conflict). Each kind has one status and one machine code.
//! `IntoResponse` is the only place an error becomes an HTTP response: it logs
//! the error against the active request and renders the JSON envelope
//!
//! ```json
//! {"error": {"code": "NOT_FOUND", "message": "...", "details": {}, "request_id": "..."}}
//! ```

use crate::middleware::RequestContext;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Free-form error details rendered as a JSON object
pub type Details = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{message}")]
    NotFound { message: String, details: Details },

    #[error("{message}")]
    Validation { message: String, details: Details },

    #[error("{message}")]
    Unauthorized { message: String, details: Details },

    #[error("{message}")]
    Forbidden { message: String, details: Details },

    #[error("{message}")]
    Conflict { message: String, details: Details },

    #[error("Database error: {0}")]
    Database(#[source] starter_core::CoreError),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details: into_details(details),
        }
    }

    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details: into_details(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details: into_details(details),
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details: into_details(details),
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details: into_details(details),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Conflict { .. } => "CONFLICT",
            Self::Database(_) | Self::Password(_) | Self::Config(_) | Self::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) | Self::Password(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Details of a typed error; opaque errors expose none
    pub fn details(&self) -> Details {
        match self {
            Self::NotFound { details, .. }
            | Self::Validation { details, .. }
            | Self::Unauthorized { details, .. }
            | Self::Forbidden { details, .. }
            | Self::Conflict { details, .. } => details.clone(),
            _ => Details::new(),
        }
    }

    /// True for the typed application kinds
    pub fn is_typed(&self) -> bool {
        !self.status().is_server_error()
    }
}

fn into_details(value: Value) -> Details {
    match value {
        Value::Object(map) => map,
        Value::Null => Details::new(),
        other => {
            let mut map = Details::new();
            map.insert("detail".to_string(), other);
            map
        }
    }
}

/// Storage failures stay opaque, except a unique index rejection which is the
/// storage-level form of a business conflict.
impl From<starter_core::CoreError> for ServerError {
    fn from(err: starter_core::CoreError) -> Self {
        match err {
            starter_core::CoreError::Duplicate { field } => {
                let message = match field.as_str() {
                    "email" => "Email already registered",
                    "username" => "Username already taken",
                    _ => "Resource conflict",
                };
                let mut details = Details::new();
                details.insert("field".to_string(), Value::String(field));
                Self::Conflict {
                    message: message.to_string(),
                    details,
                }
            }
            other => Self::Database(other),
        }
    }
}

impl From<starter_storage::StorageError> for ServerError {
    fn from(err: starter_storage::StorageError) -> Self {
        starter_core::CoreError::from(err).into()
    }
}

impl From<sqlx::Error> for ServerError {
    fn from(err: sqlx::Error) -> Self {
        starter_storage::StorageError::from(err).into()
    }
}

/// JSON error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Details,
    pub request_id: Option<String>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let details = self.details();
        let context = RequestContext::current();
        let (path, method) = context
            .as_ref()
            .map(|ctx| (ctx.path.as_str(), ctx.method.as_str()))
            .unwrap_or_default();

        let message = if self.is_typed() {
            tracing::error!(
                code,
                message = %self,
                details = %serde_json::Value::Object(details.clone()),
                path,
                method,
                "Application exception occurred"
            );
            self.to_string()
        } else {
            // Never expose internal error messages to clients.
            tracing::error!(error = ?self, path, method, "Unhandled server error");
            "Internal server error".to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
                request_id: context.map(|ctx| ctx.request_id),
            },
        };

        (status, Json(body)).into_response()
    }
}
