use chrono::Local;

use crate::domain::requests::DietPlanRequest;

use super::is_valid_id;

pub const PLAN_TYPES: [&str; 5] = [
    "WeightLoss",
    "WeightGain",
    "Maintenance",
    "Muscle Building",
    "General Health",
];

pub fn validate_diet_plan(req: &DietPlanRequest) -> Vec<String> {
    let mut errors = Vec::new();
    let today = Local::now().date_naive();

    if req.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    } else if req.title.len() < 3 || req.title.len() > 200 {
        errors.push("Title must be between 3 and 200 characters".to_string());
    }

    if let Some(description) = req.description.as_deref() {
        if description.len() > 1000 {
            errors.push("Description cannot be longer than 1000 characters".to_string());
        }
    }

    if let Some(instructions) = req.special_instructions.as_deref() {
        if instructions.len() > 1000 {
            errors.push("Special instructions cannot be longer than 1000 characters".to_string());
        }
    }

    if req.start_date < today {
        errors.push("Start date cannot be in the past".to_string());
    }

    if req.end_date <= req.start_date {
        errors.push("End date must be after the start date".to_string());
    } else {
        let duration = (req.end_date - req.start_date).num_days() + 1;
        if !(1..=365).contains(&duration) {
            errors.push("Plan duration must be between 1 and 365 days".to_string());
        }
    }

    if let Some(weight) = req.initial_weight {
        if weight <= 20.0 || weight >= 500.0 {
            errors.push("Initial weight must be between 20 and 500 kg".to_string());
        }
    }

    if let Some(weight) = req.target_weight {
        if weight <= 20.0 || weight >= 500.0 {
            errors.push("Target weight must be between 20 and 500 kg".to_string());
        }
    }

    // A plan that moves the weight less than a kilo or more than a hundred
    // is considered a data entry mistake.
    if let (Some(initial), Some(target)) = (req.initial_weight, req.target_weight) {
        let delta = (initial - target).abs();
        if !(1.0..=100.0).contains(&delta) {
            errors.push("Difference between initial and target weight must be between 1 and 100 kg".to_string());
        }
    }

    if let Some(calories) = req.daily_calorie_target {
        if calories <= 800.0 || calories >= 5000.0 {
            errors.push("Daily calorie target must be between 800 and 5000".to_string());
        }
    }

    if !PLAN_TYPES.contains(&req.plan_type.as_str()) {
        errors.push(
            "Plan type must be one of: WeightLoss, WeightGain, Maintenance, Muscle Building, General Health"
                .to_string(),
        );
    }

    if !is_valid_id(&req.client_id) {
        errors.push("Client ID must be a valid identifier".to_string());
    }

    if !is_valid_id(&req.dietitian_id) {
        errors.push("Dietitian ID must be a valid identifier".to_string());
    }

    if is_valid_id(&req.client_id) && req.client_id == req.dietitian_id {
        errors.push("Client and dietitian cannot be the same user".to_string());
    }

    errors
}
