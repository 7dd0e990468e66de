use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveTime;
use serde::Deserialize;

use crate::domain::requests::MealRequest;
use crate::domain::{Meal, UserType};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::policy;
use crate::services::messages;
use crate::state::AppState;

use super::parse_id;

/// Load the meal's plan and check the given plan policy against it.
fn check_meal_plan(
    state: &AppState,
    actor: &AuthUser,
    meal: &Meal,
    check: fn(&AuthUser, &crate::domain::DietPlan) -> bool,
) -> Result<(), ApiError> {
    let plan = state.diet_plans().get(meal.diet_plan_id)?;
    policy::require(check(actor, &plan))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
) -> ApiResult<Vec<Meal>> {
    policy::require_role(&actor, &[UserType::Admin])?;
    Ok(ApiResponse::ok(
        state.meals().list(),
        messages::OPERATION_SUCCESSFUL,
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Meal> {
    let id = parse_id(&id, messages::MEAL_NOT_FOUND)?;
    let meal = state.meals().get(id)?;
    check_meal_plan(&state, &actor, &meal, policy::can_view_plan)?;
    Ok(ApiResponse::ok(meal, messages::OPERATION_SUCCESSFUL))
}

pub async fn by_plan(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(plan_id): Path<String>,
) -> ApiResult<Vec<Meal>> {
    let plan_id = parse_id(&plan_id, messages::DIET_PLAN_NOT_FOUND)?;
    let plan = state.diet_plans().get(plan_id)?;
    policy::require(policy::can_view_plan(&actor, &plan))?;
    Ok(ApiResponse::ok(
        state.meals().by_plan(plan_id)?,
        messages::OPERATION_SUCCESSFUL,
    ))
}

pub async fn by_type(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(meal_type): Path<String>,
) -> ApiResult<Vec<Meal>> {
    policy::require_role(&actor, &[UserType::Admin, UserType::Dietitian])?;
    let mut meals = state.meals().by_type(&meal_type);
    if actor.is_dietitian() {
        // scope down to meals on plans this dietitian runs
        let plan_ids: Vec<_> = state
            .diet_plans()
            .by_dietitian(actor.user_id)
            .into_iter()
            .map(|p| p.id)
            .collect();
        meals.retain(|m| plan_ids.contains(&m.diet_plan_id));
    }
    Ok(ApiResponse::ok(meals, messages::OPERATION_SUCCESSFUL))
}

#[derive(Deserialize)]
pub struct TimeRangeQuery {
    pub start: String,
    pub end: String,
}

fn parse_time(raw: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| {
            ApiError::Validation(vec![format!("'{}' is not a valid time of day", raw)])
        })
}

pub async fn in_time_range(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Query(query): Query<TimeRangeQuery>,
) -> ApiResult<Vec<Meal>> {
    policy::require_role(&actor, &[UserType::Admin])?;
    let start = parse_time(&query.start)?;
    let end = parse_time(&query.end)?;
    Ok(ApiResponse::ok(
        state.meals().in_time_range(start, end),
        messages::OPERATION_SUCCESSFUL,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Json(req): Json<MealRequest>,
) -> ApiResult<Meal> {
    let plan_id = parse_id(&req.diet_plan_id, messages::DIET_PLAN_NOT_FOUND)?;
    let plan = state.diet_plans().get(plan_id)?;
    policy::require(policy::can_manage_plan(&actor, &plan))?;

    let meal = state.meals().create(&req)?;
    Ok(ApiResponse::created(meal, messages::MEAL_CREATED))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<MealRequest>,
) -> ApiResult<Meal> {
    let id = parse_id(&id, messages::MEAL_NOT_FOUND)?;
    let existing = state.meals().get(id)?;
    check_meal_plan(&state, &actor, &existing, policy::can_manage_plan)?;

    // moving a meal onto another plan needs manage rights there too
    let target_id = parse_id(&req.diet_plan_id, messages::DIET_PLAN_NOT_FOUND)?;
    if target_id != existing.diet_plan_id {
        let target = state.diet_plans().get(target_id)?;
        policy::require(policy::can_manage_plan(&actor, &target))?;
    }

    let meal = state.meals().update(id, &req)?;
    Ok(ApiResponse::ok(meal, messages::MEAL_UPDATED))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, messages::MEAL_NOT_FOUND)?;
    let existing = state.meals().get(id)?;
    check_meal_plan(&state, &actor, &existing, policy::can_manage_plan)?;

    state.meals().delete(id)?;
    Ok(ApiResponse::message(messages::MEAL_DELETED))
}

/// Bulk meal creation for one plan; all-or-nothing.
pub async fn create_meal_plan(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(plan_id): Path<String>,
    Json(requests): Json<Vec<MealRequest>>,
) -> ApiResult<Vec<Meal>> {
    let id = parse_id(&plan_id, messages::DIET_PLAN_NOT_FOUND)?;
    let plan = state.diet_plans().get(id)?;
    policy::require(policy::can_manage_plan(&actor, &plan))?;

    let meals = state.meals().create_meal_plan(&plan_id, &requests)?;
    Ok(ApiResponse::created(meals, messages::MEAL_CREATED))
}

pub async fn nutrition_summary(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<BTreeMap<String, f64>> {
    let id = parse_id(&id, messages::MEAL_NOT_FOUND)?;
    let meal = state.meals().get(id)?;
    check_meal_plan(&state, &actor, &meal, policy::can_view_plan)?;

    Ok(ApiResponse::ok(
        state.meals().nutrition_summary(id)?,
        messages::OPERATION_SUCCESSFUL,
    ))
}

pub async fn total_calories(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthUser>,
    Path(plan_id): Path<String>,
) -> ApiResult<f64> {
    let plan_id = parse_id(&plan_id, messages::DIET_PLAN_NOT_FOUND)?;
    let plan = state.diet_plans().get(plan_id)?;
    policy::require(policy::can_view_plan(&actor, &plan))?;

    Ok(ApiResponse::ok(
        state.meals().total_calories(plan_id)?,
        messages::OPERATION_SUCCESSFUL,
    ))
}
