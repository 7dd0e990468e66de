use std::sync::Arc;

use crate::services::{AuthService, DietPlanService, MealService, UserService};
use crate::store::Store;

/// Shared application state. Services are cheap handles over the store
/// and are constructed per call.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Store::new()),
        }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.store.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.store.clone())
    }

    pub fn diet_plans(&self) -> DietPlanService {
        DietPlanService::new(self.store.clone())
    }

    pub fn meals(&self) -> MealService {
        MealService::new(self.store.clone())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
