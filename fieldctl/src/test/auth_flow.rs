//! Signup, login, session, and password change flows.

use crate::test_utils::{create_test_app, create_test_staff, login, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
#[test_log::test]
async fn test_signup_creates_company_and_session(pool: PgPool) {
    let server = create_test_app(pool.clone()).await;

    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "email": "founder@example.com",
            "password": "a long enough password",
            "displayName": "Founder",
            "companyName": "Acme Plumbing"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["email"], "founder@example.com");
    assert!(body["data"]["activeCompanyId"].is_string());

    // The signup response set a session cookie; /auth/me resolves it.
    let me = server.get("/api/v1/auth/me").await;
    me.assert_status_ok();
    let me_body: serde_json::Value = me.json();
    assert_eq!(me_body["data"]["email"], "founder@example.com");
}

#[sqlx::test]
#[test_log::test]
async fn test_login_with_wrong_password_rejected(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({"email": staff.email, "password": "not the password"}))
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test]
#[test_log::test]
async fn test_login_unknown_email_same_error_as_wrong_password(pool: PgPool) {
    let server = create_test_app(pool.clone()).await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({"email": "nobody@example.com", "password": "whatever"}))
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test]
#[test_log::test]
async fn test_unauthenticated_request_rejected(pool: PgPool) {
    let server = create_test_app(pool.clone()).await;

    let response = server.get("/api/v1/customers").await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
#[test_log::test]
async fn test_logout_clears_session(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    server.post("/api/v1/auth/logout").await.assert_status_ok();

    let me = server.get("/api/v1/auth/me").await;
    me.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
#[test_log::test]
async fn test_change_password_flow(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let response = server
        .post("/api/v1/auth/change-password")
        .json(&json!({"currentPassword": TEST_PASSWORD, "newPassword": "an even longer password"}))
        .await;
    response.assert_status_ok();

    server.post("/api/v1/auth/logout").await.assert_status_ok();

    // Old password no longer works, new one does.
    let old = server
        .post("/api/v1/auth/login")
        .json(&json!({"email": staff.email, "password": TEST_PASSWORD}))
        .await;
    old.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let new = server
        .post("/api/v1/auth/login")
        .json(&json!({"email": staff.email, "password": "an even longer password"}))
        .await;
    new.assert_status_ok();
}

#[sqlx::test]
#[test_log::test]
async fn test_change_password_requires_current_password(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let response = server
        .post("/api/v1/auth/change-password")
        .json(&json!({"currentPassword": "wrong", "newPassword": "an even longer password"}))
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
#[test_log::test]
async fn test_healthz_needs_no_auth(pool: PgPool) {
    let server = create_test_app(pool.clone()).await;
    let response = server.get("/healthz").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}
