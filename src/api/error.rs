//! API error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validation::{FieldError, ValidationErrors};

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API error with HTTP status code and optional per-field diagnostics
#[derive(Debug, Clone, Error)]
#[error("[{status}] {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Machine-readable code for client handling
    pub code: Option<String>,
    pub detail: Vec<FieldError>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
            detail: Vec::new(),
        }
    }

    pub fn with_code(
        status: StatusCode,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::new(status, message)
        }
    }

    /// 400 for bodies that are not JSON at all
    pub fn malformed_json(reason: impl std::fmt::Display) -> Self {
        Self::with_code(
            StatusCode::BAD_REQUEST,
            format!("Request body is not valid JSON: {reason}"),
            "MALFORMED_JSON",
        )
    }

    /// 422 Unprocessable Entity
    pub fn validation(detail: Vec<FieldError>) -> Self {
        Self {
            detail,
            ..Self::with_code(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Request validation failed",
                "VALIDATION_ERROR",
            )
        }
    }

    /// 501 Not Implemented
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        Self::with_code(
            StatusCode::NOT_IMPLEMENTED,
            format!("Feature not implemented: {}", feature.into()),
            "NOT_IMPLEMENTED",
        )
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(errors.errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.message,
            "code": self.code,
        });
        if !self.detail.is_empty() {
            body["detail"] = json!(self.detail);
        }

        (self.status, Json(body)).into_response()
    }
}
