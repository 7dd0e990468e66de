pub mod audit;
pub mod diet_plan;
pub mod meal;
pub mod requests;
pub mod user;

pub use audit::{AuditEnvelope, Status};
pub use diet_plan::DietPlan;
pub use meal::Meal;
pub use user::{ClientProfile, DietitianProfile, RoleProfile, User, UserType};
