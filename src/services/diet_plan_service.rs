use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Days, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::audit::Status;
use crate::domain::requests::DietPlanRequest;
use crate::domain::{DietPlan, Meal};
use crate::error::ApiError;
use crate::store::Store;
use crate::validation::diet_plan::validate_diet_plan;

use super::messages;

/// A plan expanded with its meals in serving order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanWithMeals {
    #[serde(flatten)]
    pub plan: DietPlan,
    pub meals: Vec<Meal>,
}

pub struct DietPlanService {
    store: Arc<Store>,
}

impl DietPlanService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    fn require_plan(&self, id: Uuid) -> Result<DietPlan, ApiError> {
        self.store
            .diet_plans
            .get(id)
            .ok_or_else(|| ApiError::NotFound(messages::DIET_PLAN_NOT_FOUND.to_string()))
    }

    pub fn list(&self) -> Vec<DietPlan> {
        self.store.diet_plans.list()
    }

    pub fn get(&self, id: Uuid) -> Result<DietPlan, ApiError> {
        self.require_plan(id)
    }

    pub fn by_client(&self, client_id: Uuid) -> Vec<DietPlan> {
        self.store.plans_by_client(client_id)
    }

    pub fn by_dietitian(&self, dietitian_id: Uuid) -> Vec<DietPlan> {
        self.store.plans_by_dietitian(dietitian_id)
    }

    pub fn active(&self) -> Vec<DietPlan> {
        self.store.active_plans()
    }

    pub fn ending_within(&self, days: u64) -> Vec<DietPlan> {
        self.store.plans_ending_within(days)
    }

    pub fn with_meals(&self, id: Uuid) -> Result<PlanWithMeals, ApiError> {
        let plan = self.require_plan(id)?;
        let meals = self.store.meals_by_plan(plan.id);
        Ok(PlanWithMeals { plan, meals })
    }

    pub fn create(&self, req: &DietPlanRequest) -> Result<DietPlan, ApiError> {
        let errors = validate_diet_plan(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        // validate_diet_plan already guarantees parseable ids
        let client_id = Uuid::parse_str(&req.client_id)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let dietitian_id = Uuid::parse_str(&req.dietitian_id)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let client_ok = self
            .store
            .users
            .get(client_id)
            .map(|u| u.is_client())
            .unwrap_or(false);
        if !client_ok {
            return Err(ApiError::BusinessRule(messages::INVALID_CLIENT.to_string()));
        }
        let dietitian_ok = self
            .store
            .users
            .get(dietitian_id)
            .map(|u| u.is_dietitian())
            .unwrap_or(false);
        if !dietitian_ok {
            return Err(ApiError::BusinessRule(
                messages::INVALID_DIETITIAN.to_string(),
            ));
        }

        self.check_overlap(client_id, req, None)?;

        let plan = self.store.diet_plans.insert(DietPlan {
            id: Uuid::new_v4(),
            title: req.title.clone(),
            description: req.description.clone(),
            start_date: req.start_date,
            end_date: req.end_date,
            initial_weight: req.initial_weight,
            target_weight: req.target_weight,
            daily_calorie_target: req.daily_calorie_target,
            plan_type: req.plan_type.clone(),
            special_instructions: req.special_instructions.clone(),
            is_active: true,
            client_id,
            dietitian_id,
            audit: Default::default(),
        });

        tracing::info!("diet plan {} created for client {}", plan.id, client_id);
        Ok(plan)
    }

    pub fn update(&self, id: Uuid, req: &DietPlanRequest) -> Result<DietPlan, ApiError> {
        let existing = self.require_plan(id)?;

        let errors = validate_diet_plan(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        self.check_overlap(existing.client_id, req, Some(id))?;

        self.store
            .diet_plans
            .update(id, |plan| {
                plan.title = req.title.clone();
                plan.description = req.description.clone();
                plan.start_date = req.start_date;
                plan.end_date = req.end_date;
                plan.initial_weight = req.initial_weight;
                plan.target_weight = req.target_weight;
                plan.daily_calorie_target = req.daily_calorie_target;
                plan.plan_type = req.plan_type.clone();
                plan.special_instructions = req.special_instructions.clone();
            })
            .ok_or_else(|| ApiError::NotFound(messages::DIET_PLAN_NOT_FOUND.to_string()))
    }

    /// Retire the plan and every meal attached to it.
    pub fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.store
            .soft_remove_plan(id)
            .ok_or_else(|| ApiError::NotFound(messages::DIET_PLAN_NOT_FOUND.to_string()))?;
        Ok(())
    }

    /// Flip the flag only; the lifecycle status of the record does not
    /// move, so a toggle is not an edit.
    pub fn set_active(&self, id: Uuid, active: bool) -> Result<DietPlan, ApiError> {
        self.store
            .diet_plans
            .patch(id, |plan| plan.is_active = active)
            .ok_or_else(|| ApiError::NotFound(messages::DIET_PLAN_NOT_FOUND.to_string()))
    }

    /// Duplicate a plan for another client. The copy starts today, keeps
    /// the original duration and content, and leaves the weight fields
    /// for the new client's intake.
    pub fn clone_plan(&self, id: Uuid, new_client_id: Uuid) -> Result<DietPlan, ApiError> {
        let source = self.require_plan(id)?;

        let client_ok = self
            .store
            .users
            .get(new_client_id)
            .map(|u| u.is_client())
            .unwrap_or(false);
        if !client_ok {
            return Err(ApiError::BusinessRule(messages::INVALID_CLIENT.to_string()));
        }

        let duration = source.duration_in_days() as u64;
        let start_date = Local::now().date_naive();
        let end_date = start_date
            .checked_add_days(Days::new(duration.saturating_sub(1)))
            .ok_or_else(|| ApiError::Internal("date overflow".to_string()))?;

        let overlapping = self.store.diet_plans.find(|p| {
            p.client_id == new_client_id
                && p.audit.status == Status::Active
                && p.overlaps(start_date, end_date)
        });
        if !overlapping.is_empty() {
            return Err(ApiError::BusinessRule(
                messages::PLAN_ALREADY_EXISTS.to_string(),
            ));
        }

        let plan = self.store.diet_plans.insert(DietPlan {
            id: Uuid::new_v4(),
            title: format!("{} (Copy)", source.title),
            description: source.description.clone(),
            start_date,
            end_date,
            initial_weight: None,
            target_weight: None,
            daily_calorie_target: source.daily_calorie_target,
            plan_type: source.plan_type.clone(),
            special_instructions: source.special_instructions.clone(),
            is_active: true,
            client_id: new_client_id,
            dietitian_id: source.dietitian_id,
            audit: Default::default(),
        });
        Ok(plan)
    }

    /// Aggregate figures over the plan's meals, keyed for direct display.
    pub fn statistics(&self, id: Uuid) -> Result<BTreeMap<String, f64>, ApiError> {
        let plan = self.require_plan(id)?;
        let meals = self.store.meals_by_plan(plan.id);

        let total = |extract: fn(&Meal) -> Option<f64>| -> f64 {
            meals.iter().filter_map(extract).sum()
        };
        let total_calories = total(|m| m.calories);
        let meal_count = meals.len() as f64;

        let mut stats = BTreeMap::new();
        stats.insert("TotalMeals".to_string(), meal_count);
        stats.insert("TotalCalories".to_string(), total_calories);
        stats.insert("TotalProtein".to_string(), total(|m| m.protein));
        stats.insert(
            "TotalCarbohydrates".to_string(),
            total(|m| m.carbohydrates),
        );
        stats.insert("TotalFat".to_string(), total(|m| m.fat));
        stats.insert(
            "AverageCaloriesPerMeal".to_string(),
            if meals.is_empty() {
                0.0
            } else {
                total_calories / meal_count
            },
        );
        stats.insert(
            "DurationInDays".to_string(),
            plan.duration_in_days() as f64,
        );
        Ok(stats)
    }

    /// A client can hold at most one lifecycle-active plan per date range.
    fn check_overlap(
        &self,
        client_id: Uuid,
        req: &DietPlanRequest,
        exclude: Option<Uuid>,
    ) -> Result<(), ApiError> {
        let overlapping = self.store.diet_plans.find(|p| {
            p.client_id == client_id
                && Some(p.id) != exclude
                && p.audit.status == Status::Active
                && p.overlaps(req.start_date, req.end_date)
        });
        if overlapping.is_empty() {
            Ok(())
        } else {
            Err(ApiError::BusinessRule(
                messages::PLAN_ALREADY_EXISTS.to_string(),
            ))
        }
    }
}
