use std::sync::Arc;

use uuid::Uuid;

use crate::domain::requests::{CreateUserRequest, UserRequest};
use crate::domain::{RoleProfile, User, UserType};
use crate::error::ApiError;
use crate::store::Store;
use crate::validation::user::validate_user;

use super::messages;

pub struct UserService {
    store: Arc<Store>,
}

impl UserService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    fn require_user(&self, id: Uuid) -> Result<User, ApiError> {
        self.store
            .users
            .get(id)
            .ok_or_else(|| ApiError::NotFound(messages::USER_NOT_FOUND.to_string()))
    }

    pub fn list(&self) -> Vec<User> {
        self.store.users.list()
    }

    pub fn get(&self, id: Uuid) -> Result<User, ApiError> {
        self.require_user(id)
    }

    pub fn by_email(&self, email: &str) -> Result<User, ApiError> {
        self.store
            .user_by_email(email)
            .ok_or_else(|| ApiError::NotFound(messages::USER_NOT_FOUND.to_string()))
    }

    pub fn by_type(&self, user_type: UserType) -> Vec<User> {
        self.store.users_by_type(user_type)
    }

    pub fn dietitians(&self) -> Vec<User> {
        self.by_type(UserType::Dietitian)
    }

    pub fn clients(&self) -> Vec<User> {
        self.by_type(UserType::Client)
    }

    pub fn clients_of_dietitian(&self, dietitian_id: Uuid) -> Result<Vec<User>, ApiError> {
        let dietitian = self.require_user(dietitian_id)?;
        if !dietitian.is_dietitian() {
            return Err(ApiError::BusinessRule(
                messages::INVALID_DIETITIAN.to_string(),
            ));
        }
        Ok(self.store.clients_of_dietitian(dietitian_id))
    }

    /// Administrative account creation, no password confirmation step.
    pub fn create(&self, req: &CreateUserRequest) -> Result<User, ApiError> {
        let mut errors = validate_user(&req.user);
        if req.password.len() < 8 {
            errors.push("Password must be at least 8 characters".to_string());
        }
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if self.store.user_by_email(&req.user.email).is_some() {
            return Err(ApiError::BusinessRule(
                messages::EMAIL_ALREADY_IN_USE.to_string(),
            ));
        }
        if self.store.user_by_username(&req.user.username).is_some() {
            return Err(ApiError::BusinessRule(
                messages::USERNAME_ALREADY_IN_USE.to_string(),
            ));
        }

        let role = req.user.to_profile().map_err(ApiError::BusinessRule)?;
        self.check_dietitian_reference(&role)?;

        let user_type = role.user_type();
        let user = self.store.users.insert(User {
            id: Uuid::new_v4(),
            email: req.user.email.clone(),
            username: req.user.username.clone(),
            first_name: req.user.first_name.clone(),
            last_name: req.user.last_name.clone(),
            phone_number: req.user.phone_number.clone(),
            role,
            audit: Default::default(),
        });

        self.store.identity.register(user.id, &req.password)?;
        self.store.identity.add_role(user.id, user_type.as_str())?;
        Ok(user)
    }

    /// Full update of a profile. The account role cannot change: the
    /// submitted `userType` must match the stored one.
    pub fn update(&self, id: Uuid, req: &UserRequest) -> Result<User, ApiError> {
        let existing = self.require_user(id)?;

        let errors = validate_user(req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if req.parsed_user_type() != Some(existing.user_type()) {
            return Err(ApiError::BusinessRule(
                "User type cannot be changed".to_string(),
            ));
        }

        if let Some(other) = self.store.user_by_email(&req.email) {
            if other.id != id {
                return Err(ApiError::BusinessRule(
                    messages::EMAIL_ALREADY_IN_USE.to_string(),
                ));
            }
        }
        if let Some(other) = self.store.user_by_username(&req.username) {
            if other.id != id {
                return Err(ApiError::BusinessRule(
                    messages::USERNAME_ALREADY_IN_USE.to_string(),
                ));
            }
        }

        let role = req.to_profile().map_err(ApiError::BusinessRule)?;
        self.check_dietitian_reference(&role)?;

        self.store
            .users
            .update(id, |user| {
                user.email = req.email.clone();
                user.username = req.username.clone();
                user.first_name = req.first_name.clone();
                user.last_name = req.last_name.clone();
                user.phone_number = req.phone_number.clone();
                user.role = role;
            })
            .ok_or_else(|| ApiError::NotFound(messages::USER_NOT_FOUND.to_string()))
    }

    /// Retire the profile and purge its credentials and role grants; the
    /// account can no longer authenticate even though the row survives.
    pub fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.store
            .users
            .soft_remove(id)
            .ok_or_else(|| ApiError::NotFound(messages::USER_NOT_FOUND.to_string()))?;
        self.store.identity.drop_credentials(id);
        Ok(())
    }

    /// Put a client on a dietitian's roster. Both sides are checked for
    /// existence and role before the link is written.
    pub fn assign_client(&self, client_id: Uuid, dietitian_id: Uuid) -> Result<User, ApiError> {
        let client = self.require_user(client_id)?;
        if !client.is_client() {
            return Err(ApiError::BusinessRule(messages::INVALID_CLIENT.to_string()));
        }
        let dietitian = self.require_user(dietitian_id)?;
        if !dietitian.is_dietitian() {
            return Err(ApiError::BusinessRule(
                messages::INVALID_DIETITIAN.to_string(),
            ));
        }

        self.store
            .users
            .update(client_id, |user| {
                if let RoleProfile::Client(profile) = &mut user.role {
                    profile.dietitian_id = Some(dietitian_id);
                }
            })
            .ok_or_else(|| ApiError::NotFound(messages::USER_NOT_FOUND.to_string()))
    }

    pub fn remove_client(&self, client_id: Uuid) -> Result<User, ApiError> {
        let client = self.require_user(client_id)?;
        if !client.is_client() {
            return Err(ApiError::BusinessRule(messages::INVALID_CLIENT.to_string()));
        }

        self.store
            .users
            .update(client_id, |user| {
                if let RoleProfile::Client(profile) = &mut user.role {
                    profile.dietitian_id = None;
                }
            })
            .ok_or_else(|| ApiError::NotFound(messages::USER_NOT_FOUND.to_string()))
    }

    pub fn add_role(&self, user_id: Uuid, role: &str) -> Result<(), ApiError> {
        self.require_user(user_id)?;
        if !self.store.identity.role_exists(role) {
            return Err(ApiError::BusinessRule(
                messages::ROLE_DOES_NOT_EXIST.to_string(),
            ));
        }
        self.store.identity.add_role(user_id, role)?;
        Ok(())
    }

    pub fn remove_role(&self, user_id: Uuid, role: &str) -> Result<(), ApiError> {
        self.require_user(user_id)?;
        if !self.store.identity.remove_role(user_id, role) {
            return Err(ApiError::BusinessRule(
                messages::ROLE_DOES_NOT_EXIST.to_string(),
            ));
        }
        Ok(())
    }

    pub fn roles(&self, user_id: Uuid) -> Result<Vec<String>, ApiError> {
        self.require_user(user_id)?;
        Ok(self.store.identity.roles_of(user_id))
    }

    fn check_dietitian_reference(&self, role: &RoleProfile) -> Result<(), ApiError> {
        if let RoleProfile::Client(profile) = role {
            if let Some(dietitian_id) = profile.dietitian_id {
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
        }
        Ok(())
    }
}
