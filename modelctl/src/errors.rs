use crate::db::errors::DbError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but missing or invalid
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    Validation { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::InvalidCursor { .. } => StatusCode::BAD_REQUEST,
                DbError::UniqueViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::LimitReached { .. } => StatusCode::TOO_MANY_REQUESTS,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code carried in the response envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unauthenticated { .. } => "TOKEN_VALIDATION_FAILED",
            Error::Validation { .. } => "REQUEST_VALIDATION_ERROR",
            Error::NotFound { .. } => "OBJECT_NOT_FOUND",
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "OBJECT_NOT_FOUND",
                DbError::InvalidCursor { .. } => "REQUEST_VALIDATION_ERROR",
                DbError::UniqueViolation { .. }
                | DbError::ForeignKeyViolation { .. }
                | DbError::CheckViolation { .. } => "REQUEST_VALIDATION_ERROR",
                DbError::LimitReached { .. } => "RESOURCE_LIMIT_REACHED",
                DbError::Other(_) => "INTERNAL_SERVER_ERROR",
            },
            Error::Other(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => {
                message.clone().unwrap_or_else(|| "Authentication required".to_string())
            }
            Error::Validation { message } => message.clone(),
            Error::NotFound { resource, id } => {
                format!("{resource} with ID {id} not found")
            }
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::InvalidCursor { cursor } => {
                    format!("Pagination cursor {cursor} does not reference an existing entry")
                }
                DbError::UniqueViolation { .. } => "Resource already exists".to_string(),
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::LimitReached { resource, max_count } => {
                    format!("Cannot create more than {max_count} {resource}")
                }
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::Validation { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({
            "status": "error",
            "error": {
                "code": self.error_code(),
                "message": self.user_message(),
            }
        });

        (status, axum::response::Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::Validation {
                message: "bad".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Unauthenticated { message: None }.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::NotFound {
                resource: "Apikey".to_string(),
                id: "x".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Database(DbError::LimitReached {
                resource: "api_keys",
                max_count: 5
            })
            .status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            Error::Database(DbError::InvalidCursor {
                cursor: "abc".to_string()
            })
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::Validation {
                message: "bad".to_string()
            }
            .error_code(),
            "REQUEST_VALIDATION_ERROR"
        );
        assert_eq!(Error::Unauthenticated { message: None }.error_code(), "TOKEN_VALIDATION_FAILED");
        assert_eq!(
            Error::NotFound {
                resource: "Model".to_string(),
                id: "x".to_string()
            }
            .error_code(),
            "OBJECT_NOT_FOUND"
        );
        assert_eq!(
            Error::Database(DbError::LimitReached {
                resource: "models",
                max_count: 2
            })
            .error_code(),
            "RESOURCE_LIMIT_REACHED"
        );
        assert_eq!(
            Error::Other(anyhow::anyhow!("boom")).error_code(),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn test_internal_message_does_not_leak() {
        let err = Error::Database(DbError::Other(anyhow::anyhow!("connection refused to 10.0.0.5")));
        assert_eq!(err.user_message(), "Database error occurred");
    }
}
