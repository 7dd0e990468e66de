use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::AuditEnvelope;

pub const MEAL_TYPES: [&str; 6] = [
    "Breakfast",
    "Lunch",
    "Dinner",
    "Snack",
    "Pre-Workout",
    "Post-Workout",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub meal_type: String,
    pub scheduled_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergen_info: Option<String>,
    pub preparation_time_minutes: i32,
    pub serving_size: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub diet_plan_id: Uuid,
    #[serde(flatten)]
    pub audit: AuditEnvelope,
}

impl Meal {
    pub fn calories_per_serving(&self) -> Option<f64> {
        match self.calories {
            Some(calories) if self.serving_size > 0 => Some(calories / self.serving_size as f64),
            _ => None,
        }
    }
}
