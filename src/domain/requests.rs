use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use super::user::{ClientProfile, DietitianProfile, RoleProfile, UserType};

/// User payload as submitted over the wire: a flat record with a `userType`
/// discriminator and nullable role-specific fields. The validation layer
/// checks it as-is so every violation can be collected; only then is it
/// narrowed into the typed [`RoleProfile`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub user_type: String,
    pub phone_number: Option<String>,

    // Dietitian-specific fields
    pub license_number: Option<String>,
    pub specialization: Option<String>,
    pub years_of_experience: Option<i32>,
    pub bio: Option<String>,

    // Client-specific fields
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub initial_weight: Option<f64>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub activity_level: Option<String>,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub food_preferences: Option<String>,
    pub notes: Option<String>,
    pub dietitian_id: Option<String>,
}

impl UserRequest {
    /// Narrow the flat payload into the tagged role union. Only call after
    /// validation has passed; missing variant fields still fail soft here
    /// rather than panicking.
    pub fn to_profile(&self) -> Result<RoleProfile, String> {
        match self.user_type.as_str() {
            "Admin" => Ok(RoleProfile::Admin),
            "Dietitian" => Ok(RoleProfile::Dietitian(DietitianProfile {
                license_number: self
                    .license_number
                    .clone()
                    .ok_or("Dietitian license number is required")?,
                specialization: self
                    .specialization
                    .clone()
                    .ok_or("Specialization is required")?,
                years_of_experience: self
                    .years_of_experience
                    .ok_or("Years of experience is required")?,
                bio: self.bio.clone(),
            })),
            "Client" => {
                let dietitian_id = match self.dietitian_id.as_deref() {
                    Some(raw) => {
                        Some(Uuid::parse_str(raw).map_err(|_| "Invalid dietitian ID format")?)
                    }
                    None => None,
                };
                Ok(RoleProfile::Client(ClientProfile {
                    date_of_birth: self.date_of_birth.ok_or("Date of birth is required")?,
                    gender: self.gender.clone().ok_or("Gender is required")?,
                    height: self.height.ok_or("Height is required")?,
                    initial_weight: self.initial_weight.ok_or("Initial weight is required")?,
                    current_weight: self.current_weight.ok_or("Current weight is required")?,
                    target_weight: self.target_weight,
                    activity_level: self.activity_level.clone(),
                    medical_conditions: self.medical_conditions.clone(),
                    allergies: self.allergies.clone(),
                    food_preferences: self.food_preferences.clone(),
                    notes: self.notes.clone(),
                    dietitian_id,
                }))
            }
            other => Err(format!("Invalid user type: {}", other)),
        }
    }

    pub fn parsed_user_type(&self) -> Option<UserType> {
        UserType::parse(&self.user_type)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(flatten)]
    pub user: UserRequest,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub user_id: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub user: UserRequest,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub daily_calorie_target: Option<f64>,
    pub plan_type: String,
    pub special_instructions: Option<String>,
    pub client_id: String,
    pub dietitian_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRequest {
    pub title: String,
    pub description: Option<String>,
    pub meal_type: String,
    pub scheduled_time: NaiveTime,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
    pub allergen_info: Option<String>,
    #[serde(default)]
    pub preparation_time_minutes: i32,
    #[serde(default = "default_serving_size")]
    pub serving_size: i32,
    pub notes: Option<String>,
    pub diet_plan_id: String,
}

fn default_serving_size() -> i32 {
    1
}
