use axum::{extract::State, Extension, Json};

use crate::auth::Token;
use crate::domain::requests::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest,
};
use crate::domain::User;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::policy;
use crate::services::messages;
use crate::state::AppState;

use super::parse_id;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<User> {
    let user = state.auth().register(&req)?;
    Ok(ApiResponse::created(
        user,
        messages::REGISTRATION_SUCCESSFUL,
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Token> {
    let token = state.auth().login(&req)?;
    Ok(ApiResponse::ok(token, messages::LOGIN_SUCCESSFUL))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(_req): Json<RefreshTokenRequest>,
) -> ApiResult<Token> {
    let token = state.auth().refresh()?;
    Ok(ApiResponse::ok(token, messages::OPERATION_SUCCESSFUL))
}

pub async fn logout(State(state): State<AppState>) -> ApiResult<()> {
    Ok(ApiResponse::message(state.auth().logout()))
}

/// Only the account owner or an admin may change a password.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    let target = parse_id(&req.user_id, messages::USER_NOT_FOUND)?;
    policy::require(actor.is_admin() || actor.user_id == target)?;

    state.auth().change_password(&req)?;
    Ok(ApiResponse::message(messages::PASSWORD_CHANGED))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<()> {
    state.auth().forgot_password(&req)?;
    Ok(ApiResponse::message(messages::PASSWORD_RESET_SENT))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<()> {
    state.auth().reset_password(&req)?;
    Ok(ApiResponse::message(messages::PASSWORD_CHANGED))
}

/// Identity of the authenticated caller, straight from the token claims.
pub async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = state
        .users()
        .get(actor.user_id)
        .map_err(|_| ApiError::Unauthorized("Account no longer exists".to_string()))?;
    Ok(ApiResponse::ok(user, messages::OPERATION_SUCCESSFUL))
}
