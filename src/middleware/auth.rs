use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::auth::{validate_jwt, Claims};
use crate::domain::UserType;
use crate::error::ApiError;

/// Authenticated caller, injected as a request extension by
/// [`jwt_auth_middleware`] and extracted by protected handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub user_type: UserType,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    pub fn is_dietitian(&self) -> bool {
        self.user_type == UserType::Dietitian
    }

    pub fn is_client(&self) -> bool {
        self.user_type == UserType::Client
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            user_type: claims.user_type,
            roles: claims.roles,
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Rejects requests without a valid bearer token, otherwise attaches the
/// decoded caller to the request and continues.
pub async fn jwt_auth_middleware(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let token = match extract_bearer(&headers) {
        Some(token) => token,
        None => {
            return ApiError::Unauthorized("Missing or malformed Authorization header".to_string())
                .into_response()
        }
    };

    let claims = match validate_jwt(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!("token validation failed: {}", err);
            return ApiError::Unauthorized("Invalid or expired token".to_string()).into_response();
        }
    };

    request.extensions_mut().insert(AuthUser::from(claims));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction_requires_the_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer(&headers), Some("abc.def"));

        headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.remove("Authorization");
        assert_eq!(extract_bearer(&headers), None);
    }
}
