//! User-facing message constants, shared by services and asserted on by
//! the integration tests.

pub const OPERATION_SUCCESSFUL: &str = "Operation successful";

pub const USER_NOT_FOUND: &str = "User not found";
pub const DIET_PLAN_NOT_FOUND: &str = "Diet plan not found";
pub const MEAL_NOT_FOUND: &str = "Meal not found";

pub const EMAIL_ALREADY_IN_USE: &str = "This email address is already in use";
pub const USERNAME_ALREADY_IN_USE: &str = "This username is already in use";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const INVALID_EMAIL_OR_PASSWORD: &str = "Invalid email or password";
pub const CURRENT_PASSWORD_INCORRECT: &str = "Current password is incorrect";
pub const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token";
pub const PASSWORD_RESET_SENT: &str =
    "If the email address is registered, a reset token has been issued";

pub const PLAN_ALREADY_EXISTS: &str = "A plan already exists for this date range";
pub const INVALID_CLIENT: &str = "Invalid client";
pub const INVALID_DIETITIAN: &str = "Invalid dietitian";
pub const ROLE_DOES_NOT_EXIST: &str = "Role does not exist";

pub const REFRESH_NOT_IMPLEMENTED: &str = "Refresh token implementation pending";

pub const USER_CREATED: &str = "User created successfully";
pub const USER_UPDATED: &str = "User updated successfully";
pub const USER_DELETED: &str = "User deleted successfully";
pub const DIET_PLAN_CREATED: &str = "Diet plan created successfully";
pub const DIET_PLAN_UPDATED: &str = "Diet plan updated successfully";
pub const DIET_PLAN_DELETED: &str = "Diet plan deleted successfully";
pub const MEAL_CREATED: &str = "Meal created successfully";
pub const MEAL_UPDATED: &str = "Meal updated successfully";
pub const MEAL_DELETED: &str = "Meal deleted successfully";
pub const LOGIN_SUCCESSFUL: &str = "Login successful";
pub const LOGOUT_SUCCESSFUL: &str = "Logout successful";
pub const REGISTRATION_SUCCESSFUL: &str = "Registration successful";
pub const PASSWORD_CHANGED: &str = "Password changed successfully";
