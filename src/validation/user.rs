use chrono::{Local, Months};

use crate::domain::requests::UserRequest;
use crate::domain::UserType;

use super::{is_valid_id, EMAIL_RE, NAME_RE, PHONE_RE, USERNAME_RE};

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

pub const ACTIVITY_LEVELS: [&str; 5] = ["Sedentary", "Light", "Moderate", "Active", "VeryActive"];

fn check_cap(errors: &mut Vec<String>, value: Option<&str>, label: &str, max: usize) {
    if let Some(value) = value {
        if value.len() > max {
            errors.push(format!("{} cannot be longer than {} characters", label, max));
        }
    }
}

/// Validate the shared and role-specific fields of a user payload.
/// Role-specific rules only apply to the declared `userType`.
pub fn validate_user(req: &UserRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.first_name.trim().is_empty() {
        errors.push("First name is required".to_string());
    } else {
        if req.first_name.len() > 100 {
            errors.push("First name cannot be longer than 100 characters".to_string());
        }
        if !NAME_RE.is_match(&req.first_name) {
            errors.push("First name can only contain letters".to_string());
        }
    }

    if req.last_name.trim().is_empty() {
        errors.push("Last name is required".to_string());
    } else {
        if req.last_name.len() > 100 {
            errors.push("Last name cannot be longer than 100 characters".to_string());
        }
        if !NAME_RE.is_match(&req.last_name) {
            errors.push("Last name can only contain letters".to_string());
        }
    }

    if req.email.trim().is_empty() {
        errors.push("Email address is required".to_string());
    } else if !EMAIL_RE.is_match(&req.email) {
        errors.push("Please enter a valid email address".to_string());
    } else if req.email.len() > 255 {
        errors.push("Email address cannot be longer than 255 characters".to_string());
    }

    if req.username.trim().is_empty() {
        errors.push("Username is required".to_string());
    } else {
        if req.username.len() < 3 {
            errors.push("Username must be at least 3 characters".to_string());
        }
        if req.username.len() > 50 {
            errors.push("Username cannot be longer than 50 characters".to_string());
        }
        if !USERNAME_RE.is_match(&req.username) {
            errors.push(
                "Username can only contain letters, numbers, dots, underscores and hyphens"
                    .to_string(),
            );
        }
    }

    if let Some(phone) = req.phone_number.as_deref() {
        if !phone.is_empty() && !PHONE_RE.is_match(phone) {
            errors.push("Invalid phone number format".to_string());
        }
    }

    match UserType::parse(&req.user_type) {
        Some(UserType::Dietitian) => validate_dietitian_fields(req, &mut errors),
        Some(UserType::Client) => validate_client_fields(req, &mut errors),
        Some(UserType::Admin) => {}
        None => errors.push("Invalid user type".to_string()),
    }

    errors
}

fn validate_dietitian_fields(req: &UserRequest, errors: &mut Vec<String>) {
    match req.license_number.as_deref() {
        None | Some("") => errors.push("Dietitian license number is required".to_string()),
        Some(license) if license.len() > 255 => {
            errors.push("License number cannot be longer than 255 characters".to_string())
        }
        _ => {}
    }

    match req.specialization.as_deref() {
        None | Some("") => errors.push("Specialization is required".to_string()),
        Some(specialization) if specialization.len() > 100 => {
            errors.push("Specialization cannot be longer than 100 characters".to_string())
        }
        _ => {}
    }

    match req.years_of_experience {
        None => errors.push("Years of experience is required".to_string()),
        Some(years) if years < 0 => {
            errors.push("Years of experience cannot be less than 0".to_string())
        }
        Some(years) if years > 50 => {
            errors.push("Years of experience cannot be greater than 50".to_string())
        }
        _ => {}
    }

    check_cap(errors, req.bio.as_deref(), "Bio", 500);
}

fn validate_client_fields(req: &UserRequest, errors: &mut Vec<String>) {
    let today = Local::now().date_naive();

    match req.date_of_birth {
        None => errors.push("Date of birth is required".to_string()),
        Some(dob) => {
            if dob >= today {
                errors.push("Date of birth must be before today".to_string());
            }
            // 120 years expressed in months
            if let Some(oldest) = today.checked_sub_months(Months::new(1440)) {
                if dob <= oldest {
                    errors.push("Invalid date of birth".to_string());
                }
            }
        }
    }

    match req.gender.as_deref() {
        None | Some("") => errors.push("Gender is required".to_string()),
        Some(gender) if !GENDERS.contains(&gender) => {
            errors.push("Invalid gender value".to_string())
        }
        _ => {}
    }

    match req.height {
        None => errors.push("Height is required".to_string()),
        Some(height) if height <= 50.0 => {
            errors.push("Height must be greater than 50 cm".to_string())
        }
        Some(height) if height >= 300.0 => {
            errors.push("Height must be less than 300 cm".to_string())
        }
        _ => {}
    }

    check_weight(errors, req.initial_weight, "Initial weight", true);
    check_weight(errors, req.current_weight, "Current weight", true);
    check_weight(errors, req.target_weight, "Target weight", false);

    if let Some(level) = req.activity_level.as_deref() {
        if !level.is_empty() && !ACTIVITY_LEVELS.contains(&level) {
            errors.push("Invalid activity level".to_string());
        }
    }

    check_cap(errors, req.medical_conditions.as_deref(), "Medical conditions", 500);
    check_cap(errors, req.allergies.as_deref(), "Allergies", 500);
    check_cap(errors, req.food_preferences.as_deref(), "Food preferences", 500);
    check_cap(errors, req.notes.as_deref(), "Notes", 1000);

    if let Some(raw) = req.dietitian_id.as_deref() {
        if !raw.is_empty() && !is_valid_id(raw) {
            errors.push("Invalid dietitian ID format".to_string());
        }
    }
}

fn check_weight(errors: &mut Vec<String>, value: Option<f64>, label: &str, required: bool) {
    match value {
        None if required => errors.push(format!("{} is required", label)),
        Some(weight) if weight <= 20.0 => {
            errors.push(format!("{} must be greater than 20 kg", label))
        }
        Some(weight) if weight >= 500.0 => {
            errors.push(format!("{} must be less than 500 kg", label))
        }
        _ => {}
    }
}
