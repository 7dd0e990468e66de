use chrono::NaiveTime;

use crate::domain::meal::MEAL_TYPES;
use crate::domain::requests::MealRequest;

use super::is_valid_id;

/// Calories implied by the macro split may drift from the declared
/// calories by at most this much (kcal).
const MACRO_TOLERANCE: f64 = 50.0;

/// Inclusive scheduling window for a known meal type. Unknown types are
/// caught by the type check itself and left unrestricted here.
fn scheduling_window(meal_type: &str) -> Option<(NaiveTime, NaiveTime)> {
    let window = |start_h, start_m, end_h, end_m| {
        Some((
            NaiveTime::from_hms_opt(start_h, start_m, 0)?,
            NaiveTime::from_hms_opt(end_h, end_m, 0)?,
        ))
    };
    match meal_type {
        "Breakfast" => window(5, 0, 11, 0),
        "Lunch" => window(11, 0, 15, 0),
        "Dinner" => window(17, 0, 22, 0),
        "Snack" => window(6, 0, 23, 0),
        "Pre-Workout" | "Post-Workout" => window(5, 0, 23, 0),
        _ => None,
    }
}

pub fn validate_meal(req: &MealRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    } else if req.title.len() < 2 || req.title.len() > 200 {
        errors.push("Title must be between 2 and 200 characters".to_string());
    }

    check_text_cap(&mut errors, req.description.as_deref(), "Description", 1000);
    check_text_cap(&mut errors, req.ingredients.as_deref(), "Ingredients", 2000);
    check_text_cap(&mut errors, req.instructions.as_deref(), "Instructions", 2000);
    check_text_cap(&mut errors, req.allergen_info.as_deref(), "Allergen info", 500);
    check_text_cap(&mut errors, req.notes.as_deref(), "Notes", 1000);

    if !MEAL_TYPES.contains(&req.meal_type.as_str()) {
        errors.push(
            "Meal type must be one of: Breakfast, Lunch, Dinner, Snack, Pre-Workout, Post-Workout"
                .to_string(),
        );
    } else if let Some((earliest, latest)) = scheduling_window(&req.meal_type) {
        if req.scheduled_time < earliest || req.scheduled_time > latest {
            errors.push(format!(
                "{} must be scheduled between {} and {}",
                req.meal_type,
                earliest.format("%H:%M"),
                latest.format("%H:%M")
            ));
        }
    }

    check_nutrient(&mut errors, req.calories, "Calories", 2000.0);
    check_nutrient(&mut errors, req.protein, "Protein", 200.0);
    check_nutrient(&mut errors, req.carbohydrates, "Carbohydrates", 300.0);
    check_nutrient(&mut errors, req.fat, "Fat", 100.0);
    check_nutrient(&mut errors, req.fiber, "Fiber", 50.0);
    check_nutrient(&mut errors, req.sugar, "Sugar", 100.0);
    check_nutrient(&mut errors, req.sodium, "Sodium", 5000.0);

    if let (Some(calories), Some(protein), Some(carbs), Some(fat)) =
        (req.calories, req.protein, req.carbohydrates, req.fat)
    {
        let implied = protein * 4.0 + carbs * 4.0 + fat * 9.0;
        if (calories - implied).abs() > MACRO_TOLERANCE {
            errors.push(
                "Calories are inconsistent with the declared protein, carbohydrate and fat values"
                    .to_string(),
            );
        }
    }

    if !(0..=480).contains(&req.preparation_time_minutes) {
        errors.push("Preparation time must be between 0 and 480 minutes".to_string());
    }

    if !(1..=20).contains(&req.serving_size) {
        errors.push("Serving size must be between 1 and 20".to_string());
    }

    if !is_valid_id(&req.diet_plan_id) {
        errors.push("Diet plan ID must be a valid identifier".to_string());
    }

    errors
}

fn check_text_cap(errors: &mut Vec<String>, value: Option<&str>, name: &str, max: usize) {
    if let Some(value) = value {
        if value.len() > max {
            errors.push(format!("{} cannot be longer than {} characters", name, max));
        }
    }
}

fn check_nutrient(errors: &mut Vec<String>, value: Option<f64>, name: &str, max: f64) {
    if let Some(value) = value {
        if value < 0.0 || value > max {
            errors.push(format!("{} must be between 0 and {}", name, max));
        }
    }
}
