//! Error handling for the Marketplace Reports service
//!
//! Every failure leaves the service as a `{"error": {...}}` JSON body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    // Export errors
    #[error("Export password rejected")]
    ExportDenied,

    #[error("Export failed: {0}")]
    ExportFailed(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AppError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Validation { .. } | AppError::ValidationError(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::ExportDenied => (StatusCode::FORBIDDEN, "EXPORT_DENIED"),
            AppError::ExportFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED"),
            AppError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn detail(&self) -> ErrorDetail {
        let (_, code) = self.status_and_code();
        let (message, field) = match self {
            AppError::InvalidCredentials => ("Invalid email or password".to_string(), None),
            AppError::TokenExpired => ("Token has expired".to_string(), None),
            AppError::InvalidToken => ("Invalid token".to_string(), None),
            AppError::Unauthorized { message } => (message.clone(), None),
            AppError::Validation { field, message } => (message.clone(), Some(field.clone())),
            AppError::ValidationError(msg) => (msg.clone(), None),
            AppError::ExportDenied => ("Invalid admin password".to_string(), Some("password".to_string())),
            AppError::ExportFailed(_) => ("Failed to generate PDF. Please try again.".to_string(), None),
            AppError::DatabaseError(_) => ("A database error occurred".to_string(), None),
            AppError::Internal(msg) => (msg.clone(), None),
        };

        ErrorDetail {
            code: code.to_string(),
            message,
            field,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();
        let error_detail = self.detail();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_errors_map_to_user_messages() {
        let denied = AppError::ExportDenied;
        assert_eq!(denied.status_and_code().0, StatusCode::FORBIDDEN);
        assert_eq!(denied.detail().message, "Invalid admin password");

        let failed = AppError::ExportFailed("lopdf: broken xref".to_string());
        assert_eq!(failed.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.detail().message, "Failed to generate PDF. Please try again.");
    }

    #[test]
    fn test_validation_carries_field() {
        let err = AppError::validation("range", "Range must be one of daily, monthly, yearly");
        let detail = err.detail();
        assert_eq!(detail.code, "VALIDATION_ERROR");
        assert_eq!(detail.field.as_deref(), Some("range"));
    }

    #[test]
    fn test_unauthorized_carries_message() {
        let err = AppError::Unauthorized {
            message: "Invalid admin ID in token".to_string(),
        };
        assert_eq!(err.status_and_code(), (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"));
        assert_eq!(err.detail().message, "Invalid admin ID in token");
    }

    #[test]
    fn test_error_body_omits_missing_field() {
        let body = ErrorResponse {
            error: AppError::InvalidCredentials.detail(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["code"], "INVALID_CREDENTIALS");
        assert!(json["error"].get("field").is_none());

        let body = ErrorResponse {
            error: AppError::ExportDenied.detail(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["field"], "password");
    }
}
