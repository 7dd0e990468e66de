//! Authorization policy. Decisions are pure predicates over the
//! authenticated caller and the (already loaded) resource; handlers run
//! the existence check first, so a denial here always means the resource
//! is real and the caller may not touch it. Anything not explicitly
//! allowed is denied.

use uuid::Uuid;

use crate::domain::{DietPlan, User, UserType};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Turn a policy predicate into a guard: `require(policy)?` denies with
/// an empty 403.
pub fn require(allowed: bool) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

pub fn require_role(actor: &AuthUser, allowed: &[UserType]) -> Result<(), ApiError> {
    require(allowed.contains(&actor.user_type))
}

/// A plan is visible to admins and to both parties on the plan.
pub fn can_view_plan(actor: &AuthUser, plan: &DietPlan) -> bool {
    actor.is_admin()
        || (actor.is_dietitian() && plan.dietitian_id == actor.user_id)
        || (actor.is_client() && plan.client_id == actor.user_id)
}

/// Only admins and the owning dietitian may create, change or retire a
/// plan; clients are read-only on their own plans.
pub fn can_manage_plan(actor: &AuthUser, plan: &DietPlan) -> bool {
    actor.is_admin() || (actor.is_dietitian() && plan.dietitian_id == actor.user_id)
}

/// Profile visibility: admins see everyone, users see themselves, and a
/// dietitian sees the clients assigned to them.
pub fn can_view_user(actor: &AuthUser, target: &User) -> bool {
    actor.is_admin()
        || actor.user_id == target.id
        || (actor.is_dietitian() && target.dietitian_id() == Some(actor.user_id))
}

pub fn can_update_user(actor: &AuthUser, target: &User) -> bool {
    actor.is_admin() || actor.user_id == target.id
}

/// The client roster of a dietitian is visible to admins and to that
/// dietitian alone.
pub fn can_view_clients_of(actor: &AuthUser, dietitian_id: Uuid) -> bool {
    actor.is_admin() || (actor.is_dietitian() && actor.user_id == dietitian_id)
}

/// Assigning or removing a client is allowed for admins, and for a
/// dietitian managing their own roster.
pub fn can_assign_to_dietitian(actor: &AuthUser, dietitian_id: Uuid) -> bool {
    actor.is_admin() || (actor.is_dietitian() && actor.user_id == dietitian_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditEnvelope, ClientProfile, RoleProfile};
    use chrono::NaiveDate;

    fn actor(user_type: UserType) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            username: "someone".into(),
            user_type,
            roles: vec![user_type.as_str().to_string()],
        }
    }

    fn plan(client_id: Uuid, dietitian_id: Uuid) -> DietPlan {
        DietPlan {
            id: Uuid::new_v4(),
            title: "Plan".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 28).expect("valid date"),
            initial_weight: None,
            target_weight: None,
            daily_calorie_target: None,
            plan_type: "Maintenance".into(),
            special_instructions: None,
            is_active: true,
            client_id,
            dietitian_id,
            audit: AuditEnvelope::new(),
        }
    }

    fn client_user(id: Uuid, dietitian_id: Option<Uuid>) -> User {
        User {
            id,
            email: "c@example.com".into(),
            username: "client".into(),
            first_name: "Cleo".into(),
            last_name: "Client".into(),
            phone_number: None,
            role: RoleProfile::Client(ClientProfile {
                date_of_birth: NaiveDate::from_ymd_opt(1992, 2, 2).expect("valid date"),
                gender: "Female".into(),
                height: 170.0,
                initial_weight: 70.0,
                current_weight: 68.0,
                target_weight: None,
                activity_level: None,
                medical_conditions: None,
                allergies: None,
                food_preferences: None,
                notes: None,
                dietitian_id,
            }),
            audit: AuditEnvelope::new(),
        }
    }

    #[test]
    fn admin_passes_every_plan_check() {
        let admin = actor(UserType::Admin);
        let p = plan(Uuid::new_v4(), Uuid::new_v4());
        assert!(can_view_plan(&admin, &p));
        assert!(can_manage_plan(&admin, &p));
    }

    #[test]
    fn client_can_view_but_not_manage_own_plan() {
        let client = actor(UserType::Client);
        let p = plan(client.user_id, Uuid::new_v4());
        assert!(can_view_plan(&client, &p));
        assert!(!can_manage_plan(&client, &p));
    }

    #[test]
    fn unrelated_dietitian_is_denied() {
        let dietitian = actor(UserType::Dietitian);
        let p = plan(Uuid::new_v4(), Uuid::new_v4());
        assert!(!can_view_plan(&dietitian, &p));
        assert!(!can_manage_plan(&dietitian, &p));
    }

    #[test]
    fn dietitian_sees_assigned_clients_only() {
        let dietitian = actor(UserType::Dietitian);
        let assigned = client_user(Uuid::new_v4(), Some(dietitian.user_id));
        let stranger = client_user(Uuid::new_v4(), None);
        assert!(can_view_user(&dietitian, &assigned));
        assert!(!can_view_user(&dietitian, &stranger));
        assert!(!can_update_user(&dietitian, &assigned));
    }

    #[test]
    fn roster_checks_are_self_or_admin() {
        let dietitian = actor(UserType::Dietitian);
        assert!(can_view_clients_of(&dietitian, dietitian.user_id));
        assert!(!can_view_clients_of(&dietitian, Uuid::new_v4()));
        assert!(can_assign_to_dietitian(
            &actor(UserType::Admin),
            Uuid::new_v4()
        ));
    }

    #[test]
    fn require_maps_denial_to_forbidden() {
        assert!(require(true).is_ok());
        assert!(matches!(require(false), Err(ApiError::Forbidden)));
    }
}
