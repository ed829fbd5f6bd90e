//! Error types for Perpus server

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Validation messages keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Role check failure. Rendered as 401 like an authentication failure.
    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0:?}")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An operation that could not be completed; the message is shown as is.
    #[error("Operation failed: {0}")]
    Failed(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Server-side failure annotated with the action that failed
    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Validation failure on a single field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) | AppError::Authorization(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Failed(_) | AppError::Database(_) | AppError::Cache(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Context { source, .. } => source.status(),
        }
    }

    /// Errors caused by the server or its backing services rather than the request
    fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) | AppError::Context { .. }
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let field = field.to_string();
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} tidak valid", field),
                })
                .collect();
            fields.insert(field, messages);
        }
        AppError::Validation(fields)
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Authentication(message)
            | AppError::Authorization(message)
            | AppError::NotFound(message)
            | AppError::BadRequest(message)
            | AppError::Failed(message) => ErrorResponse { message, errors: None },
            AppError::Validation(errors) => ErrorResponse {
                message: "validasi gagal".to_string(),
                errors: Some(errors),
            },
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ErrorResponse { message: "kesalahan database".to_string(), errors: None }
            }
            AppError::Cache(e) => {
                tracing::error!("Redis error: {:?}", e);
                ErrorResponse { message: "kesalahan layanan token".to_string(), errors: None }
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse { message: "kesalahan internal server".to_string(), errors: None }
            }
            AppError::Context { message, source } => {
                tracing::error!("{}: {}", message, source);
                ErrorResponse { message, errors: None }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Attach a client-facing message to server-side failures.
/// Client errors keep their own message.
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> AppResult<T>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn context(self, message: impl Into<String>) -> AppResult<T> {
        self.map_err(|e| {
            let e = e.into();
            if e.is_server_error() {
                AppError::Context {
                    message: message.into(),
                    source: Box::new(e),
                }
            } else {
                e
            }
        })
    }
}
