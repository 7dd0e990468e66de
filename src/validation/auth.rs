use crate::domain::requests::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};

use super::{is_valid_id, user::validate_user, EMAIL_RE};

const MIN_PASSWORD_LEN: usize = 8;

fn check_password(errors: &mut Vec<String>, password: &str, label: &str) {
    if password.is_empty() {
        errors.push(format!("{} is required", label));
    } else if password.len() < MIN_PASSWORD_LEN {
        errors.push(format!("{} must be at least 8 characters", label));
    }
}

pub fn validate_register(req: &RegisterRequest) -> Vec<String> {
    let mut errors = validate_user(&req.user);
    check_password(&mut errors, &req.password, "Password");
    errors
}

pub fn validate_login(req: &LoginRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if req.email.trim().is_empty() {
        errors.push("Email is required".to_string());
    } else if !EMAIL_RE.is_match(&req.email) {
        errors.push("A valid email address is required".to_string());
    }
    if req.password.is_empty() {
        errors.push("Password is required".to_string());
    }
    errors
}

pub fn validate_change_password(req: &ChangePasswordRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if !is_valid_id(&req.user_id) {
        errors.push("User ID must be a valid identifier".to_string());
    }
    if req.current_password.is_empty() {
        errors.push("Current password is required".to_string());
    }
    check_password(&mut errors, &req.new_password, "New password");
    errors
}

pub fn validate_forgot_password(req: &ForgotPasswordRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if req.email.trim().is_empty() {
        errors.push("Email is required".to_string());
    } else if !EMAIL_RE.is_match(&req.email) {
        errors.push("A valid email address is required".to_string());
    }
    errors
}

pub fn validate_reset_password(req: &ResetPasswordRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if req.email.trim().is_empty() || !EMAIL_RE.is_match(&req.email) {
        errors.push("A valid email address is required".to_string());
    }
    if req.token.trim().is_empty() {
        errors.push("Reset token is required".to_string());
    }
    check_password(&mut errors, &req.new_password, "New password");
    errors
}
