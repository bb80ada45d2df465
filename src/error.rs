use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::database::StoreError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication errors (1xxx)
    #[serde(rename = "AUTH_1003")]
    TokenInvalid,
    #[serde(rename = "AUTH_1004")]
    TokenMissing,

    // Authorization errors (2xxx)
    #[serde(rename = "AUTHZ_2003")]
    RoleNotAuthorized,

    // Validation errors (3xxx)
    #[serde(rename = "VAL_3001")]
    InvalidInput,

    // Database errors (7xxx)
    #[serde(rename = "DB_7002")]
    QueryFailed,

    // Internal errors (9xxx)
    #[serde(rename = "INT_9998")]
    ConfigurationError,
    #[serde(rename = "INT_9999")]
    InternalServerError,
}

/// Error body. `error` and `message` are the fields existing clients read.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: bool,
    pub message: String,
    pub code: ErrorCode,
    pub request_id: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer credentials on the request
    #[error("Unauthorized: missing bearer token")]
    MissingToken,

    /// Malformed, expired or forged credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but the stored role does not satisfy the gate
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::MissingToken => ErrorCode::TokenMissing,
            ApiError::Unauthorized(_) => ErrorCode::TokenInvalid,
            ApiError::Forbidden(_) => ErrorCode::RoleNotAuthorized,
            ApiError::BadRequest(_) => ErrorCode::InvalidInput,
            ApiError::Store(_) => ErrorCode::QueryFailed,
            ApiError::Configuration(_) => ErrorCode::ConfigurationError,
            ApiError::Internal(_) => ErrorCode::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client. Credential failures stay generic.
    fn public_message(&self) -> String {
        match self {
            ApiError::MissingToken | ApiError::Unauthorized(_) => "unauthorized".to_string(),
            ApiError::Forbidden(_) => "forbidden access".to_string(),
            ApiError::BadRequest(message)
            | ApiError::Configuration(message)
            | ApiError::Internal(message) => message.clone(),
            ApiError::Store(err) => err.to_string(),
        }
    }

    /// Log error with appropriate level
    fn log_error(&self, request_id: &str) {
        match self.status_code() {
            status if status.is_server_error() => {
                error!(
                    request_id = %request_id,
                    error = %self,
                    "Server error occurred"
                );
            }
            status if status.is_client_error() => {
                warn!(
                    request_id = %request_id,
                    error = %self,
                    "Client error occurred"
                );
            }
            _ => {}
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let status = self.status_code();

        self.log_error(&request_id);

        let body = ErrorResponse {
            error: true,
            message: self.public_message(),
            code: self.error_code(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) => ApiError::BadRequest("Invalid JSON format".into()),
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::BadRequest("JSON content type required".into())
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<bson::ser::Error> for ApiError {
    fn from(err: bson::ser::Error) -> Self {
        ApiError::BadRequest(format!("Unsupported payload: {}", err))
    }
}
