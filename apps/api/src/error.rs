//! API error types and HTTP response mapping.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                                  │
//! │                                                                         │
//! │  CoreError (business rules)  ──┐                                        │
//! │                                ├──► ApiError ──► JSON {code, message}   │
//! │  DbError (storage)           ──┘        │                               │
//! │                                         ▼                               │
//! │                                  HTTP status code                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use recircle_core::CoreError;
use recircle_db::DbError;

/// Machine-readable error codes returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidQuantity,
    BelowMinimumUnit,
    InsufficientBalance,
    NoActiveRate,
    DuplicateStudentId,
    DuplicateEmail,
    AuthenticationFailed,
    Forbidden,
    NotFound,
    ValidationError,
    StoreUnavailable,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    /// HTTP status for this error code.
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::InvalidQuantity
            | ErrorCode::BelowMinimumUnit
            | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound | ErrorCode::NoActiveRate => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientBalance
            | ErrorCode::DuplicateStudentId
            | ErrorCode::DuplicateEmail => StatusCode::CONFLICT,
            ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned to HTTP clients as a JSON body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Uniform sign-in failure. The message never says whether the student id
    /// or the password was wrong.
    pub fn authentication_failed() -> Self {
        ApiError::new(ErrorCode::AuthenticationFailed, "Invalid credentials")
    }

    pub fn forbidden() -> Self {
        ApiError::new(ErrorCode::Forbidden, "Admin access required")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            error!(code = ?self.code, message = %self.message, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self }))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match err {
            CoreError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            CoreError::BelowMinimumUnit { .. } => ErrorCode::BelowMinimumUnit,
            CoreError::InsufficientBalance { .. } => ErrorCode::InsufficientBalance,
            CoreError::NoActiveRate => ErrorCode::NoActiveRate,
            CoreError::DuplicateStudentId(_) => ErrorCode::DuplicateStudentId,
            CoreError::ProfileNotFound(_) => ErrorCode::NotFound,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let code = match &err {
            DbError::NotFound { .. } => ErrorCode::NotFound,
            // The violated column name distinguishes which uniqueness rule
            // fired: users.email vs profiles.student_id.
            DbError::UniqueViolation { field, .. } => {
                if field.contains("email") {
                    ErrorCode::DuplicateEmail
                } else {
                    ErrorCode::DuplicateStudentId
                }
            }
            // The only guarded update is the redemption balance decrement, so
            // a conflict means the balance moved below the requested amount.
            DbError::Conflict { .. } => ErrorCode::InsufficientBalance,
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => ErrorCode::StoreUnavailable,
            _ => ErrorCode::DatabaseError,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
