//! HTTP error mapping

use crate::accounts::AccountError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grimoire_core::CatalogError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Produces `{"error": <message>, "code": <KIND>}` bodies. Infrastructure
/// failures are logged and reported with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// An unreadable JSON body is reported like any other invalid input
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Catalog(CatalogError::Validation(rejection.body_text()))
    }
}

/// Convenience type alias for handler return values
pub type ApiResult<T> = Result<T, ApiError>;

fn internal(err: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Catalog(err) => match err {
                CatalogError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
                CatalogError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CatalogError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CatalogError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CatalogError::Storage(_) | CatalogError::Serialization(_) => internal(err),
            },

            ApiError::Account(err) => match err {
                AccountError::EmailTaken(_) => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
                AccountError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.to_string())
                }
                AccountError::Hashing(_)
                | AccountError::Storage(_)
                | AccountError::Serialization(_) => internal(err),
            },

            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Internal(msg) => internal(msg),
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}
