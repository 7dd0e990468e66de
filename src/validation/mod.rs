//! Request validation. Each submodule exposes a pure `validate_*` function
//! that inspects a request DTO and returns every violated rule at once;
//! an empty vector means the payload is acceptable. Nothing here touches
//! storage, so cross-entity checks (existence, uniqueness) stay in the
//! service layer.

pub mod auth;
pub mod diet_plan;
pub mod meal;
pub mod user;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

pub(crate) static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

pub(crate) static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name regex"));

pub(crate) static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("valid username regex"));

pub(crate) static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid phone regex"));

/// Opaque identifiers travel as strings in request payloads; they must
/// parse as UUIDs before the service layer dereferences them.
pub fn is_valid_id(raw: &str) -> bool {
    Uuid::parse_str(raw).is_ok()
}
