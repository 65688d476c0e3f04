mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn public_routes_need_no_token() {
    let app = spawn_app(&[]).await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.request(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().starts_with("Driftfolio API"));

    let (status, body) = app.request(Method::GET, "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/portfolios/{id}/analysis"].is_object());
}

#[tokio::test]
async fn signup_login_and_access_protected_route() {
    let app = spawn_app(&[]).await;

    // Unauthenticated request is rejected
    let (status, body) = app.request(Method::GET, "/api/portfolios", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let credentials = json!({ "email": " Ann@Example.com ", "password": "secret123" });
    let (status, user) = app
        .request(Method::POST, "/api/auth/signup", None, Some(credentials))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "ann@example.com");
    assert!(user["id"].is_string());
    assert!(user.get("password_hash").is_none());

    let (status, login) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ann@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token_type"], "Bearer");
    assert_eq!(login["expires_in"], 3600);
    let token = login["access_token"].as_str().unwrap();

    let (status, body) = app
        .request(Method::GET, "/api/portfolios", Some(token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn signup_rejects_duplicates_and_weak_passwords() {
    let app = spawn_app(&[]).await;
    app.login_as("bob@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "BOB@example.com", "password": "another1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "carol@example.com", "password": "123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = spawn_app(&[]).await;
    app.login_as("dan@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "dan@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication failed: Invalid email or password");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = spawn_app(&[]).await;

    let (status, _) = app
        .request(Method::GET, "/api/portfolios", Some("not.a.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
