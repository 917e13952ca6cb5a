mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{ADMIN_EMAIL, ADMIN_PASSWORD, STAFF_EMAIL, STAFF_PASSWORD, TestApp, assert_envelope};
use school_backend::cache::TokenStore;

#[tokio::test]
async fn login_returns_token_and_public_id() {
    let app = TestApp::new();
    let uuid = app.seed_user(STAFF_EMAIL, STAFF_PASSWORD, false).await;

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": STAFF_EMAIL, "password": STAFF_PASSWORD})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["message"], "Login success");
    assert_eq!(body["id"], uuid);
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(app.tokens.len(), 1);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.seed_user("a@b.com", "right", false).await;

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "a@b.com", "password": "wrong"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["message"], "Passwords do not match.");
}

#[tokio::test]
async fn unknown_email_is_unauthorized() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "ghost@school.test", "password": "x"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "This email \"ghost@school.test\" is not found");
}

#[tokio::test]
async fn deleted_user_cannot_log_in() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let staff = app.seed_user(STAFF_EMAIL, STAFF_PASSWORD, false).await;

    let (status, _) = app
        .send("DELETE", &format!("/api/users/{staff}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": STAFF_EMAIL, "password": STAFF_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "The user is no longer active.");
}

#[tokio::test]
async fn guarded_route_without_header_is_unauthorized() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/api/subjects", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token not provided.");
    assert_envelope(&body, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_token_fails_verification() {
    let app = TestApp::new();
    app.tokens
        .save(
            "not-a-jwt",
            school_backend::cache::CachedToken {
                user_id: "someone".into(),
                expires_at: chrono::Utc::now().timestamp() + 60,
            },
        )
        .await
        .unwrap();

    let (status, body) = app
        .send("GET", "/api/auth/test-token", Some("not-a-jwt"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token verification failed.");
}

#[tokio::test]
async fn test_token_confirms_validity() {
    let app = TestApp::new();
    let token = app.staff_token().await;

    let (status, body) = app
        .send("GET", "/api/auth/test-token", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"statusCode": 200, "message": "Token valid."}));
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = TestApp::new();
    let token = app.staff_token().await;

    let (status, body) = app.send("POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    let (status, body) = app
        .send("GET", "/api/auth/test-token", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn purged_store_record_invalidates_token() {
    let app = TestApp::new();
    let token = app.staff_token().await;

    assert_eq!(app.tokens.purge_all().await.unwrap(), 1);

    let (status, _) = app.send("GET", "/api/level", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn each_login_issues_a_fresh_token() {
    let app = TestApp::new();
    app.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    let first = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let second = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_ne!(first, second);
    assert_eq!(app.tokens.len(), 2);
}

#[tokio::test]
async fn non_admin_is_forbidden_on_admin_routes() {
    let app = TestApp::new();
    let token = app.staff_token().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/roles",
            Some(&token),
            Some(json!({"designation": "Teacher"})),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["statusCode"], 403);
    assert_eq!(body["message"], "Admin access only");

    let (status, _) = app.send("GET", "/api/roles", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"statusCode": 200, "message": "ok"}));
}

#[tokio::test]
async fn unknown_route_gets_an_envelope() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/api/nowhere", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Cannot GET") && message.ends_with("/nowhere"));
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let app = TestApp::new();

    let (status, body) = app
        .send("POST", "/api/auth/login", None, Some(json!({"email": "x"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(&body, StatusCode::BAD_REQUEST);
}
