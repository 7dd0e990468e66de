use chrono::{Days, Local, NaiveTime};
use uuid::Uuid;

use crate::domain::{DietPlan, Meal, User, UserType};

use super::Store;

impl Store {
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .into_iter()
            .next()
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .into_iter()
            .next()
    }

    pub fn users_by_type(&self, user_type: UserType) -> Vec<User> {
        self.users.find(|u| u.user_type() == user_type)
    }

    pub fn clients_of_dietitian(&self, dietitian_id: Uuid) -> Vec<User> {
        self.users.find(|u| u.dietitian_id() == Some(dietitian_id))
    }

    pub fn plans_by_client(&self, client_id: Uuid) -> Vec<DietPlan> {
        self.diet_plans.find(|p| p.client_id == client_id)
    }

    pub fn plans_by_dietitian(&self, dietitian_id: Uuid) -> Vec<DietPlan> {
        self.diet_plans.find(|p| p.dietitian_id == dietitian_id)
    }

    /// Plans whose flag is on and whose date range covers today.
    pub fn active_plans(&self) -> Vec<DietPlan> {
        self.diet_plans.find(|p| p.is_currently_active())
    }

    /// Active plans finishing within the next `days` days, today included.
    pub fn plans_ending_within(&self, days: u64) -> Vec<DietPlan> {
        let today = Local::now().date_naive();
        let horizon = today.checked_add_days(Days::new(days)).unwrap_or(today);
        self.diet_plans
            .find(|p| p.is_active && p.end_date >= today && p.end_date <= horizon)
    }

    /// Meals of one plan in serving order.
    pub fn meals_by_plan(&self, plan_id: Uuid) -> Vec<Meal> {
        let mut meals = self.meals.find(|m| m.diet_plan_id == plan_id);
        meals.sort_by_key(|m| m.scheduled_time);
        meals
    }

    pub fn meals_by_type(&self, meal_type: &str) -> Vec<Meal> {
        self.meals.find(|m| m.meal_type == meal_type)
    }

    pub fn meals_in_time_range(&self, start: NaiveTime, end: NaiveTime) -> Vec<Meal> {
        let mut meals = self
            .meals
            .find(|m| m.scheduled_time >= start && m.scheduled_time <= end);
        meals.sort_by_key(|m| m.scheduled_time);
        meals
    }

    pub fn total_calories_for_plan(&self, plan_id: Uuid) -> f64 {
        self.meals_by_plan(plan_id)
            .iter()
            .filter_map(|m| m.calories)
            .sum()
    }

    /// Retire a plan together with every meal still attached to it.
    pub fn soft_remove_plan(&self, plan_id: Uuid) -> Option<DietPlan> {
        let plan = self.diet_plans.soft_remove(plan_id)?;
        for meal in self.meals.find(|m| m.diet_plan_id == plan_id) {
            self.meals.soft_remove(meal.id);
        }
        Some(plan)
    }
}
