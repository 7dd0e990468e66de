use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::ApiError;

/// The uniform success envelope. Every 2xx body the API produces goes
/// through this type so clients can rely on a single shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub is_success: bool,
    pub data: Option<T>,
    pub message: String,
    pub status_code: u16,
    pub validation_errors: Vec<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            data: Some(data),
            message: message.into(),
            status_code: StatusCode::OK.as_u16(),
            validation_errors: Vec::new(),
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            data: Some(data),
            message: message.into(),
            status_code: StatusCode::CREATED.as_u16(),
            validation_errors: Vec::new(),
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload, for deletes and password flows.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            data: None,
            message: message.into(),
            status_code: StatusCode::OK.as_u16(),
            validation_errors: Vec::new(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Handler return type: the envelope on success, the error taxonomy on
/// failure. Both sides render themselves.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
