use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::constants::ERR_INVALID_CREDENTIALS;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::error::EncodeError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bincode::error::DecodeError),

    #[error("Ledger encoding error: {0}")]
    LedgerEncoding(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Session signing key rejected")]
    SessionKey,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl AppError {
    /// True for storage-side failures the user can only retry by hand
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Transaction(_)
                | AppError::Table(_)
                | AppError::Storage(_)
                | AppError::Commit(_)
                | AppError::Serialization(_)
                | AppError::Deserialization(_)
                | AppError::LedgerEncoding(_)
        )
    }
}

/// Unreadable request bodies: wrong types, missing fields, bad JSON
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        AppError::InvalidFormat(rejection.body_text())
    }
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ref e if e.is_persistence_failure() => {
                tracing::error!("Persistence failure: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage is temporarily unavailable, please try again".to_string(),
                )
            }
            AppError::PasswordHash(ref e) => {
                tracing::error!("Password hashing error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::TaskJoin(ref e) => {
                tracing::error!("Task join error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::SessionKey => {
                tracing::error!("Session signing key rejected");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::UserAlreadyExists => {
                (StatusCode::CONFLICT, "User already exists".to_string())
            }
            AppError::UserNotFound => (StatusCode::UNAUTHORIZED, "User not found".to_string()),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, ERR_INVALID_CREDENTIALS.to_string())
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Missing or expired session".to_string(),
            ),
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg),
            // Covered by the persistence guard above
            e => {
                tracing::error!("Unhandled error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_maps_to_bad_request() {
        let response = AppError::InvalidArgument("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_persistence_failure_maps_to_internal_error() {
        let err = AppError::LedgerEncoding(serde_json::from_str::<i64>("broken").unwrap_err());
        assert!(err.is_persistence_failure());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_errors_map_to_unauthorized() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
