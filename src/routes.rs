use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, diet_plans, meals, users};
use crate::middleware::auth::jwt_auth_middleware;
use crate::state::AppState;

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": "nutriplan-api",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Nutrition planning and client management API",
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh-token", post(auth::refresh))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password));

    let protected = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/auth/me", get(auth::me))
        // users
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/by-email", get(users::by_email))
        .route("/api/users/dietitians", get(users::dietitians))
        .route("/api/users/clients", get(users::clients))
        .route(
            "/api/users/dietitian/:id/clients",
            get(users::clients_of_dietitian),
        )
        .route("/api/users/assign-client", post(users::assign_client))
        .route("/api/users/remove-client", post(users::remove_client))
        .route(
            "/api/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route(
            "/api/users/:id/roles",
            get(users::roles)
                .post(users::add_role)
                .delete(users::remove_role),
        )
        // diet plans
        .route(
            "/api/diet-plans",
            get(diet_plans::list).post(diet_plans::create),
        )
        .route("/api/diet-plans/active", get(diet_plans::active))
        .route("/api/diet-plans/ending-soon", get(diet_plans::ending_soon))
        .route("/api/diet-plans/client/:id", get(diet_plans::by_client))
        .route(
            "/api/diet-plans/dietitian/:id",
            get(diet_plans::by_dietitian),
        )
        .route(
            "/api/diet-plans/:id",
            get(diet_plans::get)
                .put(diet_plans::update)
                .delete(diet_plans::delete),
        )
        .route(
            "/api/diet-plans/:id/with-meals",
            get(diet_plans::with_meals),
        )
        .route(
            "/api/diet-plans/:id/statistics",
            get(diet_plans::statistics),
        )
        .route("/api/diet-plans/:id/activate", post(diet_plans::activate))
        .route(
            "/api/diet-plans/:id/deactivate",
            post(diet_plans::deactivate),
        )
        .route("/api/diet-plans/:id/clone", post(diet_plans::clone_plan))
        // meals
        .route("/api/meals", get(meals::list).post(meals::create))
        .route("/api/meals/time-range", get(meals::in_time_range))
        .route("/api/meals/type/:meal_type", get(meals::by_type))
        .route("/api/meals/plan/:id", get(meals::by_plan))
        .route(
            "/api/meals/plan/:id/total-calories",
            get(meals::total_calories),
        )
        .route("/api/meals/plan/:id/batch", post(meals::create_meal_plan))
        .route(
            "/api/meals/:id",
            get(meals::get).put(meals::update).delete(meals::delete),
        )
        .route("/api/meals/:id/nutrition", get(meals::nutrition_summary))
        .layer(middleware::from_fn(jwt_auth_middleware));

    public
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
