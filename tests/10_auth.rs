mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

#[tokio::test]
async fn register_returns_envelope_with_created_user() {
    let app = test_app();
    let mut payload = client_payload("casey@example.com", "casey");
    payload["password"] = json!("well-kept-secret");
    payload["confirmPassword"] = json!("well-kept-secret");

    let (status, body) = send(&app, "POST", "/api/auth/register", None, Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isSuccess"], true);
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["data"]["email"], "casey@example.com");
    assert_eq!(body["data"]["userType"], "Client");
    assert_eq!(body["data"]["status"], "Active");
    assert!(body["data"]["creationDate"].is_string());
    assert!(body["data"]["updateDate"].is_null());
}

#[tokio::test]
async fn duplicate_email_is_rejected_before_validation() {
    let app = test_app();
    register_and_login(&app, client_payload("casey@example.com", "casey")).await;

    // second registration reuses the email with an otherwise broken payload
    let mut payload = client_payload("casey@example.com", "other");
    payload["firstName"] = json!("X");
    payload["password"] = json!("well-kept-secret");
    payload["confirmPassword"] = json!("well-kept-secret");

    let (status, body) = send(&app, "POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This email address is already in use");
}

#[tokio::test]
async fn mismatched_passwords_fail_registration() {
    let app = test_app();
    let mut payload = client_payload("casey@example.com", "casey");
    payload["password"] = json!("well-kept-secret");
    payload["confirmPassword"] = json!("something-else");

    let (status, body) = send(&app, "POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Passwords do not match");
}

#[tokio::test]
async fn invalid_registration_collects_all_field_errors() {
    let app = test_app();
    let mut payload = client_payload("not-an-email", "x");
    payload["firstName"] = json!("9");
    payload["password"] = json!("well-kept-secret");
    payload["confirmPassword"] = json!("well-kept-secret");

    let (status, body) = send(&app, "POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["isSuccess"], false);
    let errors = body["validationErrors"].as_array().expect("errors listed");
    assert!(errors.len() >= 3);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test_app();
    register_and_login(&app, client_payload("casey@example.com", "casey")).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "casey@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn login_with_unknown_email_is_not_found() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ghost@example.com", "password": "whatever-it-takes" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn refresh_token_is_declared_unimplemented() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/refresh-token",
        None,
        Some(json!({ "refreshToken": "anything" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["message"], "Refresh token implementation pending");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/users", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_the_callers_profile() {
    let app = test_app();
    let (user_id, token) =
        register_and_login(&app, client_payload("casey@example.com", "casey")).await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user_id.as_str());
    assert_eq!(body["data"]["username"], "casey");
}

#[tokio::test]
async fn change_password_takes_effect_on_next_login() {
    let app = test_app();
    let (user_id, token) =
        register_and_login(&app, client_payload("casey@example.com", "casey")).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&token),
        Some(json!({
            "userId": user_id,
            "currentPassword": "well-kept-secret",
            "newPassword": "brand-new-secret",
            "confirmPassword": "brand-new-secret",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "change failed: {}", body);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "casey@example.com", "password": "well-kept-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "casey@example.com", "password": "brand-new-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn changing_someone_elses_password_is_forbidden() {
    let app = test_app();
    let (victim_id, _) =
        register_and_login(&app, client_payload("victim@example.com", "victim")).await;
    let (_, token) = register_and_login(&app, client_payload("casey@example.com", "casey")).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&token),
        Some(json!({
            "userId": victim_id,
            "currentPassword": "well-kept-secret",
            "newPassword": "hijacked-secret",
            "confirmPassword": "hijacked-secret",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    // denial carries no envelope
    assert!(body.is_null());
}

#[tokio::test]
async fn forgot_password_never_reveals_account_existence() {
    let app = test_app();
    register_and_login(&app, client_payload("casey@example.com", "casey")).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/forgot-password",
        None,
        Some(json!({ "email": "casey@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let known_message = body["message"].clone();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/forgot-password",
        None,
        Some(json!({ "email": "ghost@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], known_message);
}
