mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

async fn setup_plan(app: &axum::Router) -> (String, String, String) {
    let (dietitian_id, dietitian_token) =
        register_and_login(app, dietitian_payload("dana@example.com", "dana")).await;
    let (client_id, client_token) =
        register_and_login(app, client_payload("casey@example.com", "casey")).await;

    let (status, body) = send(
        app,
        "POST",
        "/api/diet-plans",
        Some(&dietitian_token),
        Some(plan_payload(&client_id, &dietitian_id, 0, 27)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "plan failed: {}", body);
    let plan_id = body["data"]["id"].as_str().expect("plan id").to_string();
    (plan_id, dietitian_token, client_token)
}

#[tokio::test]
async fn meal_creation_succeeds_inside_the_scheduling_window() {
    let app = test_app();
    let (plan_id, dietitian_token, _) = setup_plan(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&dietitian_token),
        Some(meal_payload(&plan_id, "Breakfast", "08:30:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    assert_eq!(body["data"]["mealType"], "Breakfast");
    assert_eq!(body["data"]["status"], "Active");
}

#[tokio::test]
async fn meal_outside_its_window_is_rejected() {
    let app = test_app();
    let (plan_id, dietitian_token, _) = setup_plan(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&dietitian_token),
        Some(meal_payload(&plan_id, "Breakfast", "12:30:00")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["validationErrors"].as_array().expect("errors");
    assert!(errors
        .iter()
        .any(|e| e.as_str().unwrap().contains("Breakfast must be scheduled")));
}

#[tokio::test]
async fn inconsistent_macros_are_rejected() {
    let app = test_app();
    let (plan_id, dietitian_token, _) = setup_plan(&app).await;

    let mut payload = meal_payload(&plan_id, "Lunch", "12:30:00");
    // declared 520 kcal but macros imply over 900
    payload["fat"] = json!(60.0);
    let (status, body) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&dietitian_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["validationErrors"].as_array().expect("errors");
    assert!(errors
        .iter()
        .any(|e| e.as_str().unwrap().contains("inconsistent")));
}

#[tokio::test]
async fn missing_plan_wins_over_bad_meal_data() {
    let app = test_app();
    let (_, dietitian_token, _) = setup_plan(&app).await;

    let mut payload = meal_payload(&uuid::Uuid::new_v4().to_string(), "Breakfast", "03:00:00");
    payload["calories"] = json!(9999.0);
    let (status, body) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&dietitian_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Diet plan not found");
}

#[tokio::test]
async fn plan_meals_are_listed_in_serving_order() {
    let app = test_app();
    let (plan_id, dietitian_token, client_token) = setup_plan(&app).await;

    for (meal_type, time) in [
        ("Dinner", "19:00:00"),
        ("Breakfast", "07:30:00"),
        ("Lunch", "12:30:00"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/meals",
            Some(&dietitian_token),
            Some(meal_payload(&plan_id, meal_type, time)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // the plan's client may read the schedule
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/meals/plan/{}", plan_id),
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let meals = body["data"].as_array().expect("meal list");
    let order: Vec<&str> = meals
        .iter()
        .map(|m| m["mealType"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["Breakfast", "Lunch", "Dinner"]);
}

#[tokio::test]
async fn clients_cannot_add_meals() {
    let app = test_app();
    let (plan_id, _, client_token) = setup_plan(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&client_token),
        Some(meal_payload(&plan_id, "Lunch", "12:30:00")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn meals_cannot_be_moved_onto_a_foreign_plan() {
    let app = test_app();
    let (plan_id, dietitian_token, _) = setup_plan(&app).await;

    let (other_dietitian_id, other_token) =
        register_and_login(&app, dietitian_payload("miro@example.com", "miro")).await;
    let (other_client_id, _) =
        register_and_login(&app, client_payload("noor@example.com", "noor")).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/diet-plans",
        Some(&other_token),
        Some(plan_payload(&other_client_id, &other_dietitian_id, 0, 27)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "plan failed: {}", body);
    let foreign_plan_id = body["data"]["id"].as_str().expect("plan id").to_string();

    let (_, body) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&dietitian_token),
        Some(meal_payload(&plan_id, "Lunch", "12:30:00")),
    )
    .await;
    let meal_id = body["data"]["id"].as_str().expect("meal id").to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/meals/{}", meal_id),
        Some(&dietitian_token),
        Some(meal_payload(&foreign_plan_id, "Lunch", "13:00:00")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_null());

    // the meal stayed on its original plan
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/meals/{}", meal_id),
        Some(&dietitian_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["dietPlanId"], plan_id.as_str());
}

#[tokio::test]
async fn batch_creation_is_all_or_nothing() {
    let app = test_app();
    let (plan_id, dietitian_token, _) = setup_plan(&app).await;

    let mut bad = meal_payload(&plan_id, "Dinner", "19:00:00");
    bad["servingSize"] = json!(25);
    let batch = json!([
        meal_payload(&plan_id, "Breakfast", "08:00:00"),
        bad,
    ]);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/meals/plan/{}/batch", plan_id),
        Some(&dietitian_token),
        Some(batch),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["validationErrors"].as_array().expect("errors");
    assert!(errors.iter().any(|e| e.as_str().unwrap().starts_with("Meal 2:")));

    // nothing from the failed batch was written
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/meals/plan/{}", plan_id),
        Some(&dietitian_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().expect("meal list").is_empty());

    // the corrected batch goes through in one shot
    let batch = json!([
        meal_payload(&plan_id, "Breakfast", "08:00:00"),
        meal_payload(&plan_id, "Dinner", "19:00:00"),
    ]);
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/meals/plan/{}/batch", plan_id),
        Some(&dietitian_token),
        Some(batch),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"].as_array().expect("created meals").len(), 2);
}

#[tokio::test]
async fn nutrition_summary_reports_per_serving_figures() {
    let app = test_app();
    let (plan_id, dietitian_token, _) = setup_plan(&app).await;

    let mut payload = meal_payload(&plan_id, "Lunch", "12:30:00");
    payload["servingSize"] = json!(2);
    let (_, body) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&dietitian_token),
        Some(payload),
    )
    .await;
    let meal_id = body["data"]["id"].as_str().expect("meal id").to_string();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/meals/{}/nutrition", meal_id),
        Some(&dietitian_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let summary = &body["data"];
    assert_eq!(summary["Calories"], 520.0);
    assert_eq!(summary["Protein"], 42.0);
    assert_eq!(summary["CaloriesPerServing"], 260.0);
}

#[tokio::test]
async fn total_calories_sum_the_whole_plan() {
    let app = test_app();
    let (plan_id, dietitian_token, client_token) = setup_plan(&app).await;

    for (meal_type, time) in [("Breakfast", "08:00:00"), ("Lunch", "12:30:00")] {
        send(
            &app,
            "POST",
            "/api/meals",
            Some(&dietitian_token),
            Some(meal_payload(&plan_id, meal_type, time)),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/meals/plan/{}/total-calories", plan_id),
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], 1040.0);
}

#[tokio::test]
async fn updating_a_meal_marks_it_modified() {
    let app = test_app();
    let (plan_id, dietitian_token, _) = setup_plan(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/meals",
        Some(&dietitian_token),
        Some(meal_payload(&plan_id, "Lunch", "12:30:00")),
    )
    .await;
    let meal_id = body["data"]["id"].as_str().expect("meal id").to_string();

    let mut update = meal_payload(&plan_id, "Lunch", "13:00:00");
    update["title"] = json!("Rebalanced lunch bowl");
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/meals/{}", meal_id),
        Some(&dietitian_token),
        Some(update),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "update failed: {}", body);
    assert_eq!(body["data"]["id"], meal_id.as_str());
    assert_eq!(body["data"]["title"], "Rebalanced lunch bowl");
    assert_eq!(body["data"]["status"], "Modified");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/meals/{}", meal_id),
        Some(&dietitian_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/meals/{}", meal_id),
        Some(&dietitian_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
