//! HTTP error responses.
//!
//! Every repository error funnels through [`ApiError`] so handlers can use
//! `?` and still produce the uniform `{"error", "message"}` JSON envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use fintrack_db::GateError;
use fintrack_db::repositories::{
    AccountError, BudgetError, CategoryError, NotificationError, TransactionError, UserError,
};
use fintrack_shared::{AppError, JwtError};

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error type produced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] AppError);

impl ApiError {
    /// An internal error with a human-readable message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self(AppError::Internal(message.into()))
    }

    /// An authentication failure.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Database details stay in the logs, not the response body.
        let message = match &self.0 {
            AppError::Database(detail) => {
                error!(error = %detail, "Database error");
                "An internal error occurred".to_string()
            }
            AppError::Internal(detail) => {
                error!(error = %detail, "Internal error");
                "An internal error occurred".to_string()
            }
            AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg) => msg.clone(),
        };

        let body = json!({
            "error": self.0.error_code(),
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        Self(err.into())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Unauthorized(err.to_string()))
    }
}

macro_rules! from_repo_error {
    ($($repo_err:ident),+ $(,)?) => {
        $(
            impl From<$repo_err> for ApiError {
                fn from(err: $repo_err) -> Self {
                    match err {
                        $repo_err::Gate(gate) => gate.into(),
                        $repo_err::Database(db) => Self(AppError::Database(db.to_string())),
                    }
                }
            }
        )+
    };
}

from_repo_error!(
    AccountError,
    BudgetError,
    CategoryError,
    NotificationError,
    TransactionError,
    UserError,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_not_found_maps_to_404() {
        let err: ApiError = GateError::NotFound("Budget not found".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_gate_conflict_maps_to_409() {
        let err: ApiError = GateError::Conflict("Budget already exists".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_database_detail_is_not_leaked() {
        let err: ApiError = ApiError(AppError::Database("connection refused".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
