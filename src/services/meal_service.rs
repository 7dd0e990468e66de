use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveTime;
use uuid::Uuid;

use crate::domain::requests::MealRequest;
use crate::domain::Meal;
use crate::error::ApiError;
use crate::store::Store;
use crate::validation::meal::validate_meal;

use super::messages;

pub struct MealService {
    store: Arc<Store>,
}

impl MealService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    fn require_meal(&self, id: Uuid) -> Result<Meal, ApiError> {
        self.store
            .meals
            .get(id)
            .ok_or_else(|| ApiError::NotFound(messages::MEAL_NOT_FOUND.to_string()))
    }

    pub fn list(&self) -> Vec<Meal> {
        self.store.meals.list()
    }

    pub fn get(&self, id: Uuid) -> Result<Meal, ApiError> {
        self.require_meal(id)
    }

    pub fn by_plan(&self, plan_id: Uuid) -> Result<Vec<Meal>, ApiError> {
        if self.store.diet_plans.get(plan_id).is_none() {
            return Err(ApiError::NotFound(
                messages::DIET_PLAN_NOT_FOUND.to_string(),
            ));
        }
        Ok(self.store.meals_by_plan(plan_id))
    }

    pub fn by_type(&self, meal_type: &str) -> Vec<Meal> {
        self.store.meals_by_type(meal_type)
    }

    pub fn in_time_range(&self, start: NaiveTime, end: NaiveTime) -> Vec<Meal> {
        self.store.meals_in_time_range(start, end)
    }

    pub fn create(&self, req: &MealRequest) -> Result<Meal, ApiError> {
        let plan_id = self.existing_plan_id(&req.diet_plan_id)?;

        let errors = validate_meal(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let meal = self.store.meals.insert(Self::from_request(req, plan_id));
        tracing::info!("meal {} added to plan {}", meal.id, plan_id);
        Ok(meal)
    }

    pub fn update(&self, id: Uuid, req: &MealRequest) -> Result<Meal, ApiError> {
        self.require_meal(id)?;
        let plan_id = self.existing_plan_id(&req.diet_plan_id)?;

        let errors = validate_meal(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        self.store
            .meals
            .update(id, |meal| {
                let fresh = Self::from_request(req, plan_id);
                let audit = meal.audit.clone();
                *meal = Meal {
                    id,
                    audit,
                    ..fresh
                };
            })
            .ok_or_else(|| ApiError::NotFound(messages::MEAL_NOT_FOUND.to_string()))
    }

    pub fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.store
            .meals
            .soft_remove(id)
            .ok_or_else(|| ApiError::NotFound(messages::MEAL_NOT_FOUND.to_string()))?;
        Ok(())
    }

    /// Bulk creation for one plan. Every meal is validated up front; a
    /// single bad entry fails the whole batch and nothing is written.
    pub fn create_meal_plan(
        &self,
        plan_id_raw: &str,
        requests: &[MealRequest],
    ) -> Result<Vec<Meal>, ApiError> {
        let plan_id = self.existing_plan_id(plan_id_raw)?;

        let mut errors = Vec::new();
        for (index, req) in requests.iter().enumerate() {
            for error in validate_meal(req) {
                errors.push(format!("Meal {}: {}", index + 1, error));
            }
        }
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let meals = requests
            .iter()
            .map(|req| Self::from_request(req, plan_id))
            .collect();
        Ok(self.store.meals.insert_many(meals))
    }

    /// Nutrition totals for one meal, keyed for direct display.
    pub fn nutrition_summary(&self, id: Uuid) -> Result<BTreeMap<String, f64>, ApiError> {
        let meal = self.require_meal(id)?;

        let mut summary = BTreeMap::new();
        summary.insert("Calories".to_string(), meal.calories.unwrap_or(0.0));
        summary.insert("Protein".to_string(), meal.protein.unwrap_or(0.0));
        summary.insert(
            "Carbohydrates".to_string(),
            meal.carbohydrates.unwrap_or(0.0),
        );
        summary.insert("Fat".to_string(), meal.fat.unwrap_or(0.0));
        summary.insert("Fiber".to_string(), meal.fiber.unwrap_or(0.0));
        summary.insert("Sugar".to_string(), meal.sugar.unwrap_or(0.0));
        summary.insert("Sodium".to_string(), meal.sodium.unwrap_or(0.0));
        summary.insert(
            "CaloriesPerServing".to_string(),
            meal.calories_per_serving().unwrap_or(0.0),
        );
        Ok(summary)
    }

    pub fn total_calories(&self, plan_id: Uuid) -> Result<f64, ApiError> {
        if self.store.diet_plans.get(plan_id).is_none() {
            return Err(ApiError::NotFound(
                messages::DIET_PLAN_NOT_FOUND.to_string(),
            ));
        }
        Ok(self.store.total_calories_for_plan(plan_id))
    }

    fn existing_plan_id(&self, raw: &str) -> Result<Uuid, ApiError> {
        let plan_id = Uuid::parse_str(raw)
            .map_err(|_| ApiError::NotFound(messages::DIET_PLAN_NOT_FOUND.to_string()))?;
        if self.store.diet_plans.get(plan_id).is_none() {
            return Err(ApiError::NotFound(
                messages::DIET_PLAN_NOT_FOUND.to_string(),
            ));
        }
        Ok(plan_id)
    }

    fn from_request(req: &MealRequest, plan_id: Uuid) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            title: req.title.clone(),
            description: req.description.clone(),
            meal_type: req.meal_type.clone(),
            scheduled_time: req.scheduled_time,
            ingredients: req.ingredients.clone(),
            instructions: req.instructions.clone(),
            calories: req.calories,
            protein: req.protein,
            carbohydrates: req.carbohydrates,
            fat: req.fat,
            fiber: req.fiber,
            sugar: req.sugar,
            sodium: req.sodium,
            allergen_info: req.allergen_info.clone(),
            preparation_time_minutes: req.preparation_time_minutes,
            serving_size: req.serving_size,
            notes: req.notes.clone(),
            diet_plan_id: plan_id,
            audit: Default::default(),
        }
    }
}
