//! Domain services. Each service owns the rules of one aggregate: it runs
//! request validation, enforces cross-entity invariants against the store
//! and maps failures onto the error taxonomy. Handlers stay thin on top.

pub mod auth_service;
pub mod diet_plan_service;
pub mod meal_service;
pub mod messages;
pub mod user_service;

pub use auth_service::AuthService;
pub use diet_plan_service::{DietPlanService, PlanWithMeals};
pub use meal_service::MealService;
pub use user_service::UserService;
