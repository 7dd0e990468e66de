use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{generate_jwt, Claims, Token};
use crate::domain::requests::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
use crate::domain::{AuditEnvelope, User};
use crate::error::ApiError;
use crate::store::Store;
use crate::validation::auth::{
    validate_change_password, validate_forgot_password, validate_login, validate_register,
    validate_reset_password,
};

use super::messages;

pub struct AuthService {
    store: Arc<Store>,
}

impl AuthService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Self-service registration. Password agreement and email uniqueness
    /// are checked before field validation, matching the order clients
    /// have come to rely on for error messages.
    pub fn register(&self, req: &RegisterRequest) -> Result<User, ApiError> {
        if req.password != req.confirm_password {
            return Err(ApiError::BusinessRule(
                messages::PASSWORDS_DO_NOT_MATCH.to_string(),
            ));
        }
        if self.store.user_by_email(&req.user.email).is_some() {
            return Err(ApiError::BusinessRule(
                messages::EMAIL_ALREADY_IN_USE.to_string(),
            ));
        }

        let errors = validate_register(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if self.store.user_by_username(&req.user.username).is_some() {
            return Err(ApiError::BusinessRule(
                messages::USERNAME_ALREADY_IN_USE.to_string(),
            ));
        }

        let role = req.user.to_profile().map_err(ApiError::BusinessRule)?;

        // A client may arrive pre-assigned; the reference must be a real
        // dietitian account.
        if let Some(dietitian_id) = match &role {
            crate::domain::RoleProfile::Client(profile) => profile.dietitian_id,
            _ => None,
        } {
            let valid = self
                .store
                .users
                .get(dietitian_id)
                .map(|u| u.is_dietitian())
                .unwrap_or(false);
            if !valid {
                return Err(ApiError::BusinessRule(
                    messages::INVALID_DIETITIAN.to_string(),
                ));
            }
        }

        let user_type = role.user_type();
        let user = self.store.users.insert(User {
            id: Uuid::new_v4(),
            email: req.user.email.clone(),
            username: req.user.username.clone(),
            first_name: req.user.first_name.clone(),
            last_name: req.user.last_name.clone(),
            phone_number: req.user.phone_number.clone(),
            role,
            audit: AuditEnvelope::new(),
        });

        self.store.identity.register(user.id, &req.password)?;
        self.store.identity.add_role(user.id, user_type.as_str())?;

        tracing::info!("registered {} account {}", user_type, user.id);
        Ok(user)
    }

    pub fn login(&self, req: &LoginRequest) -> Result<Token, ApiError> {
        let errors = validate_login(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let user = self
            .store
            .user_by_email(&req.email)
            .ok_or_else(|| ApiError::NotFound(messages::USER_NOT_FOUND.to_string()))?;

        let correct = self.store.identity.check_password(user.id, &req.password)?;
        if !correct {
            return Err(ApiError::Unauthorized(
                messages::INVALID_EMAIL_OR_PASSWORD.to_string(),
            ));
        }

        let roles = self.store.identity.roles_of(user.id);
        let claims = Claims::new(&user, roles);
        let access_token =
            generate_jwt(&claims).map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(Token {
            access_token,
            expiration_date: claims.expiration(),
            refresh_token: Uuid::new_v4().simple().to_string(),
        })
    }

    /// Token refresh is not wired up yet; the endpoint exists so clients
    /// can already code against it.
    pub fn refresh(&self) -> Result<Token, ApiError> {
        Err(ApiError::NotImplemented(
            messages::REFRESH_NOT_IMPLEMENTED.to_string(),
        ))
    }

    /// Stateless tokens mean logout is client-side; the endpoint only
    /// confirms the convention.
    pub fn logout(&self) -> &'static str {
        messages::LOGOUT_SUCCESSFUL
    }

    pub fn change_password(&self, req: &ChangePasswordRequest) -> Result<(), ApiError> {
        if req.new_password != req.confirm_password {
            return Err(ApiError::BusinessRule(
                messages::PASSWORDS_DO_NOT_MATCH.to_string(),
            ));
        }

        let errors = validate_change_password(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let user_id = Uuid::parse_str(&req.user_id)
            .map_err(|_| ApiError::NotFound(messages::USER_NOT_FOUND.to_string()))?;
        if self.store.users.get(user_id).is_none() {
            return Err(ApiError::NotFound(messages::USER_NOT_FOUND.to_string()));
        }

        let correct = self
            .store
            .identity
            .check_password(user_id, &req.current_password)?;
        if !correct {
            return Err(ApiError::BusinessRule(
                messages::CURRENT_PASSWORD_INCORRECT.to_string(),
            ));
        }

        self.store.identity.change_password(user_id, &req.new_password)?;
        Ok(())
    }

    /// Never reveals whether the address exists; the response reads the
    /// same either way.
    pub fn forgot_password(&self, req: &ForgotPasswordRequest) -> Result<(), ApiError> {
        let errors = validate_forgot_password(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if let Some(user) = self.store.user_by_email(&req.email) {
            let token = self.store.identity.generate_reset_token(&user.email);
            // Stands in for mail delivery.
            tracing::info!("password reset token issued for {}: {}", user.id, token);
        }
        Ok(())
    }

    pub fn reset_password(&self, req: &ResetPasswordRequest) -> Result<(), ApiError> {
        if req.new_password != req.confirm_password {
            return Err(ApiError::BusinessRule(
                messages::PASSWORDS_DO_NOT_MATCH.to_string(),
            ));
        }

        let errors = validate_reset_password(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let user = self
            .store
            .user_by_email(&req.email)
            .ok_or_else(|| ApiError::BusinessRule(messages::INVALID_RESET_TOKEN.to_string()))?;

        let ok = self
            .store
            .identity
            .reset_password(&user.email, &req.token, user.id, &req.new_password)?;
        if !ok {
            return Err(ApiError::BusinessRule(
                messages::INVALID_RESET_TOKEN.to_string(),
            ));
        }
        Ok(())
    }
}
