use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::store::identity::IdentityError;

/// API error taxonomy. Every failure a service can produce maps onto one of
/// these variants, and every variant renders as the standard response
/// envelope (except `Forbidden`, which is an empty 403 signal).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Field/cross-field rule violations, all collected, never partial.
    #[error("Validation error")]
    Validation(Vec<String>),

    /// Domain rule failed: overlap, bad cross-entity reference, role mismatch.
    #[error("{0}")]
    BusinessRule(String),

    /// Identity provider or persistence adapter reported a failure; the
    /// provider's own description is surfaced verbatim.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Access denied")]
    Forbidden,

    /// Resource absent, or filtered out by the soft-delete envelope.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    NotImplemented(String),

    /// Any unhandled fault. Detail is logged, not echoed to the client.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        // Forbidden deliberately carries no envelope, matching the bare
        // 403 the authorization layer produces everywhere.
        if matches!(self, ApiError::Forbidden) {
            return StatusCode::FORBIDDEN.into_response();
        }

        let status = self.status_code();
        let (message, validation_errors) = match self {
            ApiError::Validation(errors) => ("Validation error".to_string(), errors),
            ApiError::Internal(detail) => {
                tracing::error!("unhandled service fault: {}", detail);
                ("An error occurred during operation".to_string(), Vec::new())
            }
            other => (other.to_string(), Vec::new()),
        };

        let body = json!({
            "isSuccess": false,
            "data": null,
            "message": message,
            "statusCode": status.as_u16(),
            "validationErrors": validation_errors,
        });

        (status, Json(body)).into_response()
    }
}
