use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use uuid::Uuid;

/// Roles every deployment starts with. The registry can grow at runtime
/// but role assignment always checks membership first.
const SEED_ROLES: [&str; 3] = ["Admin", "Dietitian", "Client"];

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Password hashing failed")]
    Hashing,
    #[error("No credentials on record for this user")]
    UnknownUser,
    #[error("Role does not exist")]
    UnknownRole,
}

/// Credential and role storage, kept apart from user profiles so password
/// hashes and reset tokens never ride along on a serialized user.
pub struct IdentityProvider {
    credentials: RwLock<HashMap<Uuid, String>>,
    role_registry: RwLock<HashSet<String>>,
    user_roles: RwLock<HashMap<Uuid, Vec<String>>>,
    reset_tokens: RwLock<HashMap<String, String>>,
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self {
            credentials: RwLock::new(HashMap::new()),
            role_registry: RwLock::new(
                SEED_ROLES.iter().map(|r| r.to_string()).collect(),
            ),
            user_roles: RwLock::new(HashMap::new()),
            reset_tokens: RwLock::new(HashMap::new()),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| IdentityError::Hashing)
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

impl IdentityProvider {
    /// Store credentials for a new account.
    pub fn register(&self, user_id: Uuid, password: &str) -> Result<(), IdentityError> {
        let hash = hash_password(password)?;
        write(&self.credentials).insert(user_id, hash);
        Ok(())
    }

    pub fn check_password(&self, user_id: Uuid, password: &str) -> Result<bool, IdentityError> {
        let credentials = read(&self.credentials);
        let hash = credentials.get(&user_id).ok_or(IdentityError::UnknownUser)?;
        Ok(verify_password(password, hash))
    }

    pub fn change_password(&self, user_id: Uuid, new_password: &str) -> Result<(), IdentityError> {
        let mut credentials = write(&self.credentials);
        if !credentials.contains_key(&user_id) {
            return Err(IdentityError::UnknownUser);
        }
        let hash = hash_password(new_password)?;
        credentials.insert(user_id, hash);
        Ok(())
    }

    pub fn drop_credentials(&self, user_id: Uuid) {
        write(&self.credentials).remove(&user_id);
        write(&self.user_roles).remove(&user_id);
    }

    /// Issue a single-use reset token keyed by the account email.
    pub fn generate_reset_token(&self, email: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        write(&self.reset_tokens).insert(email.to_ascii_lowercase(), token.clone());
        token
    }

    /// Consume a reset token; on a match the password is replaced and the
    /// token invalidated.
    pub fn reset_password(
        &self,
        email: &str,
        token: &str,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<bool, IdentityError> {
        let key = email.to_ascii_lowercase();
        let matches = read(&self.reset_tokens)
            .get(&key)
            .map(|stored| stored == token)
            .unwrap_or(false);
        if !matches {
            return Ok(false);
        }
        self.change_password(user_id, new_password)?;
        write(&self.reset_tokens).remove(&key);
        Ok(true)
    }

    pub fn role_exists(&self, role: &str) -> bool {
        read(&self.role_registry).contains(role)
    }

    /// Assign a registered role; assigning twice is a no-op.
    pub fn add_role(&self, user_id: Uuid, role: &str) -> Result<(), IdentityError> {
        if !self.role_exists(role) {
            return Err(IdentityError::UnknownRole);
        }
        let mut user_roles = write(&self.user_roles);
        let roles = user_roles.entry(user_id).or_default();
        if !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
        Ok(())
    }

    /// Remove a role from a user; returns whether anything changed.
    pub fn remove_role(&self, user_id: Uuid, role: &str) -> bool {
        let mut user_roles = write(&self.user_roles);
        match user_roles.get_mut(&user_id) {
            Some(roles) => {
                let before = roles.len();
                roles.retain(|r| r != role);
                roles.len() != before
            }
            None => false,
        }
    }

    pub fn roles_of(&self, user_id: Uuid) -> Vec<String> {
        read(&self.user_roles)
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip_and_rejection() {
        let identity = IdentityProvider::default();
        let user_id = Uuid::new_v4();
        identity.register(user_id, "correct horse").expect("register");

        assert!(identity.check_password(user_id, "correct horse").expect("known user"));
        assert!(!identity.check_password(user_id, "wrong").expect("known user"));
        assert!(matches!(
            identity.check_password(Uuid::new_v4(), "any"),
            Err(IdentityError::UnknownUser)
        ));
    }

    #[test]
    fn dropped_credentials_no_longer_authenticate() {
        let identity = IdentityProvider::default();
        let user_id = Uuid::new_v4();
        identity.register(user_id, "short-lived").expect("register");
        identity.add_role(user_id, "Client").expect("seeded role");

        identity.drop_credentials(user_id);
        assert!(matches!(
            identity.check_password(user_id, "short-lived"),
            Err(IdentityError::UnknownUser)
        ));
        assert!(identity.roles_of(user_id).is_empty());
    }

    #[test]
    fn reset_token_is_single_use() {
        let identity = IdentityProvider::default();
        let user_id = Uuid::new_v4();
        identity.register(user_id, "original-pass").expect("register");

        let token = identity.generate_reset_token("User@Example.com");
        let ok = identity
            .reset_password("user@example.com", &token, user_id, "fresh-password")
            .expect("reset");
        assert!(ok);
        assert!(identity.check_password(user_id, "fresh-password").expect("known user"));

        let again = identity
            .reset_password("user@example.com", &token, user_id, "another-one")
            .expect("reset");
        assert!(!again);
    }

    #[test]
    fn roles_are_registry_checked_and_deduplicated() {
        let identity = IdentityProvider::default();
        let user_id = Uuid::new_v4();

        assert!(matches!(
            identity.add_role(user_id, "Wizard"),
            Err(IdentityError::UnknownRole)
        ));

        identity.add_role(user_id, "Client").expect("seeded role");
        identity.add_role(user_id, "Client").expect("idempotent");
        assert_eq!(identity.roles_of(user_id), vec!["Client".to_string()]);

        assert!(identity.remove_role(user_id, "Client"));
        assert!(!identity.remove_role(user_id, "Client"));
    }
}
