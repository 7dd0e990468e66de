//! HTTP handlers. Each handler parses the request, loads the resource,
//! runs the policy check, delegates to the owning service and wraps the
//! result in the response envelope. Existence is always checked before
//! authorization, so a missing resource reads as 404 even to callers who
//! could not have touched it.

pub mod auth;
pub mod diet_plans;
pub mod meals;
pub mod users;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids arrive as strings; anything that does not parse refers to
/// nothing and is reported as absent.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}
