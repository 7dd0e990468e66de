use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::domain::requests::{CreateUserRequest, UserRequest};
use crate::domain::{User, UserType};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::policy;
use crate::services::messages;
use crate::state::AppState;

use super::parse_id;

pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
) -> ApiResult<Vec<User>> {
    policy::require_role(&actor, &[UserType::Admin])?;
    Ok(ApiResponse::ok(
        state.users().list(),
        messages::OPERATION_SUCCESSFUL,
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let id = parse_id(&id, messages::USER_NOT_FOUND)?;
    let user = state.users().get(id)?;
    policy::require(policy::can_view_user(&actor, &user))?;
    Ok(ApiResponse::ok(user, messages::OPERATION_SUCCESSFUL))
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

pub async fn by_email(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<User> {
    let user = state.users().by_email(&query.email)?;
    policy::require(policy::can_view_user(&actor, &user))?;
    Ok(ApiResponse::ok(user, messages::OPERATION_SUCCESSFUL))
}

pub async fn dietitians(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
) -> ApiResult<Vec<User>> {
    policy::require_role(&actor, &[UserType::Admin, UserType::Dietitian, UserType::Client])?;
    Ok(ApiResponse::ok(
        state.users().dietitians(),
        messages::OPERATION_SUCCESSFUL,
    ))
}

pub async fn clients(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
) -> ApiResult<Vec<User>> {
    policy::require_role(&actor, &[UserType::Admin])?;
    Ok(ApiResponse::ok(
        state.users().clients(),
        messages::OPERATION_SUCCESSFUL,
    ))
}

pub async fn clients_of_dietitian(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(dietitian_id): Path<String>,
) -> ApiResult<Vec<User>> {
    let dietitian_id = parse_id(&dietitian_id, messages::USER_NOT_FOUND)?;
    // roster existence first, then visibility
    let roster = state.users().clients_of_dietitian(dietitian_id)?;
    policy::require(policy::can_view_clients_of(&actor, dietitian_id))?;
    Ok(ApiResponse::ok(roster, messages::OPERATION_SUCCESSFUL))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<User> {
    policy::require_role(&actor, &[UserType::Admin])?;
    let user = state.users().create(&req)?;
    Ok(ApiResponse::created(user, messages::USER_CREATED))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<UserRequest>,
) -> ApiResult<User> {
    let id = parse_id(&id, messages::USER_NOT_FOUND)?;
    let existing = state.users().get(id)?;
    policy::require(policy::can_update_user(&actor, &existing))?;

    let user = state.users().update(id, &req)?;
    Ok(ApiResponse::ok(user, messages::USER_UPDATED))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    policy::require_role(&actor, &[UserType::Admin])?;
    let id = parse_id(&id, messages::USER_NOT_FOUND)?;
    state.users().delete(id)?;
    Ok(ApiResponse::message(messages::USER_DELETED))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignClientQuery {
    pub client_id: String,
    pub dietitian_id: String,
}

pub async fn assign_client(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Query(query): Query<AssignClientQuery>,
) -> ApiResult<User> {
    let client_id = parse_id(&query.client_id, messages::USER_NOT_FOUND)?;
    let dietitian_id = parse_id(&query.dietitian_id, messages::USER_NOT_FOUND)?;
    policy::require(policy::can_assign_to_dietitian(&actor, dietitian_id))?;

    let user = state.users().assign_client(client_id, dietitian_id)?;
    Ok(ApiResponse::ok(user, messages::OPERATION_SUCCESSFUL))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveClientQuery {
    pub client_id: String,
}

pub async fn remove_client(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Query(query): Query<RemoveClientQuery>,
) -> ApiResult<User> {
    let client_id = parse_id(&query.client_id, messages::USER_NOT_FOUND)?;
    let client = state.users().get(client_id)?;
    policy::require(
        actor.is_admin()
            || client
                .dietitian_id()
                .map(|d| policy::can_assign_to_dietitian(&actor, d))
                .unwrap_or(false),
    )?;

    let user = state.users().remove_client(client_id)?;
    Ok(ApiResponse::ok(user, messages::OPERATION_SUCCESSFUL))
}

#[derive(Deserialize)]
pub struct RoleQuery {
    pub role: String,
}

pub async fn add_role(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<RoleQuery>,
) -> ApiResult<()> {
    policy::require_role(&actor, &[UserType::Admin])?;
    let id = parse_id(&id, messages::USER_NOT_FOUND)?;
    state.users().add_role(id, &query.role)?;
    Ok(ApiResponse::message(messages::OPERATION_SUCCESSFUL))
}

pub async fn remove_role(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<RoleQuery>,
) -> ApiResult<()> {
    policy::require_role(&actor, &[UserType::Admin])?;
    let id = parse_id(&id, messages::USER_NOT_FOUND)?;
    state.users().remove_role(id, &query.role)?;
    Ok(ApiResponse::message(messages::OPERATION_SUCCESSFUL))
}

pub async fn roles(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<String>> {
    let id = parse_id(&id, messages::USER_NOT_FOUND)?;
    let target = state.users().get(id)?;
    policy::require(policy::can_view_user(&actor, &target))?;
    Ok(ApiResponse::ok(
        state.users().roles(id)?,
        messages::OPERATION_SUCCESSFUL,
    ))
}
