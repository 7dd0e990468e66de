use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config;
use crate::domain::{User, UserType};

/// JWT claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub user_type: UserType,
    pub full_name: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User, roles: Vec<String>) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::hours(config().security.jwt_expiry_hours as i64);
        Self {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            user_type: user.user_type(),
            full_name: user.full_name(),
            roles,
            exp: expiry.timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn expiration(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Issued token pair as returned by the login endpoint. The refresh token
/// is an opaque placeholder until the refresh flow lands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub access_token: String,
    pub expiration_date: DateTime<Utc>,
    pub refresh_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(config().security.jwt_secret.as_bytes());
    Ok(encode(&Header::default(), claims, &key)?)
}

pub fn validate_jwt(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config().security.jwt_secret.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditEnvelope, RoleProfile};

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@nutriplan.test".into(),
            username: "admin".into(),
            first_name: "Ada".into(),
            last_name: "Admin".into(),
            phone_number: None,
            role: RoleProfile::Admin,
            audit: AuditEnvelope::new(),
        }
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let user = sample_user();
        let claims = Claims::new(&user, vec!["Admin".into()]);
        let token = generate_jwt(&claims).expect("encodes");
        let decoded = validate_jwt(&token).expect("decodes");
        assert_eq!(decoded.sub, user.id);
        assert_eq!(decoded.user_type, UserType::Admin);
        assert_eq!(decoded.roles, vec!["Admin".to_string()]);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let user = sample_user();
        let claims = Claims::new(&user, vec![]);
        let mut token = generate_jwt(&claims).expect("encodes");
        token.push('x');
        assert!(validate_jwt(&token).is_err());
    }
}
