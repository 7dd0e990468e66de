use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::AuditEnvelope;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_calorie_target: Option<f64>,
    pub plan_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub is_active: bool,
    pub client_id: Uuid,
    pub dietitian_id: Uuid,
    #[serde(flatten)]
    pub audit: AuditEnvelope,
}

impl DietPlan {
    /// Inclusive day count: a plan from Monday to Tuesday lasts two days.
    pub fn duration_in_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Inclusive date-range intersection in any direction: either range
    /// containing the other, or partial overlap on either edge.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }

    pub fn is_currently_active(&self) -> bool {
        let today = Local::now().date_naive();
        self.is_active && self.start_date <= today && today <= self.end_date
    }
}
