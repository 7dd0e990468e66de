//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Days, Local};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use nutriplan_api::routes;
use nutriplan_api::state::AppState;

pub fn test_app() -> Router {
    routes::app(AppState::new())
}

/// Fire one request and decode the envelope. A `None` body sends an empty
/// request; a missing token leaves the Authorization header off.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = builder
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .expect("request builds");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router never fails");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub fn client_payload(email: &str, username: &str) -> Value {
    json!({
        "firstName": "Casey",
        "lastName": "Client",
        "email": email,
        "username": username,
        "userType": "Client",
        "dateOfBirth": "1991-04-12",
        "gender": "Female",
        "height": 168.0,
        "initialWeight": 74.0,
        "currentWeight": 72.0,
    })
}

pub fn dietitian_payload(email: &str, username: &str) -> Value {
    json!({
        "firstName": "Dana",
        "lastName": "Dietitian",
        "email": email,
        "username": username,
        "userType": "Dietitian",
        "licenseNumber": "LIC-20417",
        "specialization": "Sports nutrition",
        "yearsOfExperience": 8,
    })
}

pub fn admin_payload(email: &str, username: &str) -> Value {
    json!({
        "firstName": "Avery",
        "lastName": "Admin",
        "email": email,
        "username": username,
        "userType": "Admin",
    })
}

/// Register an account and log it in; returns (user id, bearer token).
pub async fn register_and_login(app: &Router, mut payload: Value) -> (String, String) {
    let email = payload["email"].as_str().expect("payload has email").to_string();
    payload["password"] = json!("well-kept-secret");
    payload["confirmPassword"] = json!("well-kept-secret");

    let (status, body) = send(app, "POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let user_id = body["data"]["id"].as_str().expect("id in response").to_string();

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "well-kept-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    let token = body["data"]["accessToken"]
        .as_str()
        .expect("token in response")
        .to_string();

    (user_id, token)
}

pub fn today_plus(days: u64) -> String {
    Local::now()
        .date_naive()
        .checked_add_days(Days::new(days))
        .expect("valid date")
        .to_string()
}

pub fn plan_payload(client_id: &str, dietitian_id: &str, start: u64, end: u64) -> Value {
    json!({
        "title": "Four week reset",
        "startDate": today_plus(start),
        "endDate": today_plus(end),
        "initialWeight": 80.0,
        "targetWeight": 74.0,
        "dailyCalorieTarget": 1900.0,
        "planType": "WeightLoss",
        "clientId": client_id,
        "dietitianId": dietitian_id,
    })
}

pub fn meal_payload(plan_id: &str, meal_type: &str, time: &str) -> Value {
    json!({
        "title": "Grilled chicken bowl",
        "mealType": meal_type,
        "scheduledTime": time,
        "ingredients": "Chicken, rice, greens",
        "calories": 520.0,
        "protein": 42.0,
        "carbohydrates": 55.0,
        "fat": 12.0,
        "preparationTimeMinutes": 25,
        "servingSize": 1,
        "dietPlanId": plan_id,
    })
}
