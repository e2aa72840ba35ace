//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Registration-time misconfiguration. Aborts `create` synchronously.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("path must be a string")]
    PathNotString,
    #[error("model missing: entity kind is empty")]
    MissingModel,
    #[error("invalid path '{0}': must start with '/'")]
    InvalidPath(String),
    #[error("library settings already installed")]
    AlreadyInstalled,
    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Error code carried by a data-access rejection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// Numeric code, used verbatim as the HTTP status.
    Status(u16),
    /// Symbolic code (e.g. a validation error name); maps to 400.
    Name(String),
    /// Code key present without a value. Serialized as `null`; maps to 400.
    Empty,
}

/// Rejection from the data-access contract. Recovered at the adapter boundary.
#[derive(Error, Debug, Clone, Default, PartialEq)]
#[error("{}", .message.as_deref().unwrap_or("data access error"))]
pub struct DataAccessError {
    pub code: Option<ErrorCode>,
    pub message: Option<String>,
}

impl DataAccessError {
    /// Error without a code: answered with 500.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: Some(message.into()),
        }
    }

    pub fn with_status(code: u16, message: impl Into<String>) -> Self {
        Self {
            code: Some(ErrorCode::Status(code)),
            message: Some(message.into()),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(ErrorCode::Name(code.into())),
            message: Some(message.into()),
        }
    }

    /// Error whose code key is present but carries no value: answered with 400.
    pub fn with_empty_code(message: impl Into<String>) -> Self {
        Self {
            code: Some(ErrorCode::Empty),
            message: Some(message.into()),
        }
    }

    /// Missing entity, signaled as code 404 with no message.
    pub fn not_found() -> Self {
        Self {
            code: Some(ErrorCode::Status(404)),
            message: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.code {
            Some(ErrorCode::Status(code)) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Some(ErrorCode::Name(_)) | Some(ErrorCode::Empty) => StatusCode::BAD_REQUEST,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body: `{code, message}` when a code is present, `{message}` otherwise.
    pub fn body(&self) -> Value {
        let status = self.status();
        let message = match (&self.code, &self.message) {
            (_, Some(m)) => m.clone(),
            (Some(ErrorCode::Status(404)), None) => "Not found".to_string(),
            (_, None) => status.canonical_reason().unwrap_or("Error").to_string(),
        };
        match &self.code {
            Some(code) => json!({ "code": code, "message": message }),
            None => json!({ "message": message }),
        }
    }
}

impl IntoResponse for DataAccessError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "data access failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "data access rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

/// Failures raised while adapting a request.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
    #[error("file upload requires a custom handler")]
    UploadWithoutHandler,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DataAccess(e) => e.status(),
            AppError::UploadWithoutHandler => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::DataAccess(e) => e.into_response(),
            other => {
                let status = other.status();
                (status, Json(json!({ "message": other.to_string() }))).into_response()
            }
        }
    }
}
