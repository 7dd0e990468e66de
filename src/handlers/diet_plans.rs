use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::requests::DietPlanRequest;
use crate::domain::{DietPlan, UserType};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::policy;
use crate::services::{messages, PlanWithMeals};
use crate::state::AppState;

use super::parse_id;

pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
) -> ApiResult<Vec<DietPlan>> {
    // Admins see everything; dietitians and clients see their own side.
    let plans = match actor.user_type {
        UserType::Admin => state.diet_plans().list(),
        UserType::Dietitian => state.diet_plans().by_dietitian(actor.user_id),
        UserType::Client => state.diet_plans().by_client(actor.user_id),
    };
    Ok(ApiResponse::ok(plans, messages::OPERATION_SUCCESSFUL))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<DietPlan> {
    let id = parse_id(&id, messages::DIET_PLAN_NOT_FOUND)?;
    let plan = state.diet_plans().get(id)?;
    policy::require(policy::can_view_plan(&actor, &plan))?;
    Ok(ApiResponse::ok(plan, messages::OPERATION_SUCCESSFUL))
}

pub async fn with_meals(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<PlanWithMeals> {
    let id = parse_id(&id, messages::DIET_PLAN_NOT_FOUND)?;
    let expanded = state.diet_plans().with_meals(id)?;
    policy::require(policy::can_view_plan(&actor, &expanded.plan))?;
    Ok(ApiResponse::ok(expanded, messages::OPERATION_SUCCESSFUL))
}

pub async fn by_client(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(client_id): Path<String>,
) -> ApiResult<Vec<DietPlan>> {
    let client_id = parse_id(&client_id, messages::USER_NOT_FOUND)?;
    state.users().get(client_id)?;

    let plans = match actor.user_type {
        UserType::Admin => state.diet_plans().by_client(client_id),
        // a dietitian sees only the plans they run for this client
        UserType::Dietitian => state
            .diet_plans()
            .by_client(client_id)
            .into_iter()
            .filter(|p| p.dietitian_id == actor.user_id)
            .collect(),
        UserType::Client => {
            policy::require(actor.user_id == client_id)?;
            state.diet_plans().by_client(client_id)
        }
    };
    Ok(ApiResponse::ok(plans, messages::OPERATION_SUCCESSFUL))
}

pub async fn by_dietitian(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(dietitian_id): Path<String>,
) -> ApiResult<Vec<DietPlan>> {
    let dietitian_id = parse_id(&dietitian_id, messages::USER_NOT_FOUND)?;
    state.users().get(dietitian_id)?;
    policy::require(policy::can_view_clients_of(&actor, dietitian_id))?;
    Ok(ApiResponse::ok(
        state.diet_plans().by_dietitian(dietitian_id),
        messages::OPERATION_SUCCESSFUL,
    ))
}

pub async fn active(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
) -> ApiResult<Vec<DietPlan>> {
    policy::require_role(&actor, &[UserType::Admin, UserType::Dietitian])?;
    let mut plans = state.diet_plans().active();
    if actor.is_dietitian() {
        plans.retain(|p| p.dietitian_id == actor.user_id);
    }
    Ok(ApiResponse::ok(plans, messages::OPERATION_SUCCESSFUL))
}

#[derive(Deserialize)]
pub struct EndingQuery {
    #[serde(default = "default_ending_days")]
    pub days: u64,
}

fn default_ending_days() -> u64 {
    7
}

pub async fn ending_soon(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Query(query): Query<EndingQuery>,
) -> ApiResult<Vec<DietPlan>> {
    policy::require_role(&actor, &[UserType::Admin, UserType::Dietitian])?;
    let mut plans = state.diet_plans().ending_within(query.days);
    if actor.is_dietitian() {
        plans.retain(|p| p.dietitian_id == actor.user_id);
    }
    Ok(ApiResponse::ok(plans, messages::OPERATION_SUCCESSFUL))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Json(mut req): Json<DietPlanRequest>,
) -> ApiResult<DietPlan> {
    policy::require_role(&actor, &[UserType::Admin, UserType::Dietitian])?;
    // a dietitian always creates plans under their own name
    if actor.is_dietitian() {
        req.dietitian_id = actor.user_id.to_string();
    }
    let plan = state.diet_plans().create(&req)?;
    Ok(ApiResponse::created(plan, messages::DIET_PLAN_CREATED))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<DietPlanRequest>,
) -> ApiResult<DietPlan> {
    let id = parse_id(&id, messages::DIET_PLAN_NOT_FOUND)?;
    let existing = state.diet_plans().get(id)?;
    policy::require(policy::can_manage_plan(&actor, &existing))?;

    let plan = state.diet_plans().update(id, &req)?;
    Ok(ApiResponse::ok(plan, messages::DIET_PLAN_UPDATED))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, messages::DIET_PLAN_NOT_FOUND)?;
    let existing = state.diet_plans().get(id)?;
    policy::require(policy::can_manage_plan(&actor, &existing))?;

    state.diet_plans().delete(id)?;
    Ok(ApiResponse::message(messages::DIET_PLAN_DELETED))
}

pub async fn activate(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<DietPlan> {
    set_active(state, actor, &id, true).await
}

pub async fn deactivate(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<DietPlan> {
    set_active(state, actor, &id, false).await
}

async fn set_active(
    state: AppState,
    actor: AuthUser,
    raw_id: &str,
    active: bool,
) -> ApiResult<DietPlan> {
    let id = parse_id(raw_id, messages::DIET_PLAN_NOT_FOUND)?;
    let existing = state.diet_plans().get(id)?;
    policy::require(policy::can_manage_plan(&actor, &existing))?;

    let plan = state.diet_plans().set_active(id, active)?;
    Ok(ApiResponse::ok(plan, messages::OPERATION_SUCCESSFUL))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneQuery {
    pub new_client_id: Uuid,
}

pub async fn clone_plan(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<CloneQuery>,
) -> ApiResult<DietPlan> {
    let id = parse_id(&id, messages::DIET_PLAN_NOT_FOUND)?;
    let source = state.diet_plans().get(id)?;
    policy::require(policy::can_manage_plan(&actor, &source))?;

    let plan = state.diet_plans().clone_plan(id, query.new_client_id)?;
    Ok(ApiResponse::created(plan, messages::DIET_PLAN_CREATED))
}

pub async fn statistics(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<BTreeMap<String, f64>> {
    let id = parse_id(&id, messages::DIET_PLAN_NOT_FOUND)?;
    let plan = state.diet_plans().get(id)?;
    policy::require(policy::can_view_plan(&actor, &plan))?;

    Ok(ApiResponse::ok(
        state.diet_plans().statistics(id)?,
        messages::OPERATION_SUCCESSFUL,
    ))
}
