//! Tenant isolation: every entity route is scoped to the session's active
//! company, and cross-company ids are rejected before any data is touched.

use crate::test_utils::{create_test_app, create_test_customer, create_test_staff, login};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test]
#[test_log::test]
async fn test_customer_crud_roundtrip(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let created = server
        .post("/api/v1/customers")
        .json(&json!({"name": "Dana Poole", "email": "dana@example.com"}))
        .await;
    created.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = created.json();
    let id = body["data"]["id"].as_str().expect("id").to_string();
    assert_eq!(body["data"]["hasPortalAccess"], false);

    let listed = server.get("/api/v1/customers").await;
    listed.assert_status_ok();
    let listed: serde_json::Value = listed.json();
    assert_eq!(listed["data"].as_array().expect("array").len(), 1);

    let updated = server
        .put(&format!("/api/v1/customers/{id}"))
        .json(&json!({"phone": "555-0101"}))
        .await;
    updated.assert_status_ok();
    let updated: serde_json::Value = updated.json();
    assert_eq!(updated["data"]["phone"], "555-0101");
    assert_eq!(updated["data"]["name"], "Dana Poole");

    let deleted = server.delete(&format!("/api/v1/customers/{id}")).await;
    deleted.assert_status(axum::http::StatusCode::NO_CONTENT);

    let gone = server.get(&format!("/api/v1/customers/{id}")).await;
    gone.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[test_log::test]
async fn test_cross_company_customer_is_forbidden(pool: PgPool) {
    let alice = create_test_staff(&pool).await;
    let bob = create_test_staff(&pool).await;
    let foreign = create_test_customer(&pool, bob.company.id, "Bob's Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &alice.email).await;

    let response = server.get(&format!("/api/v1/customers/{}", foreign.id)).await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not authorized");

    // Deleting it is equally off limits, and the row survives.
    let response = server.delete(&format!("/api/v1/customers/{}", foreign.id)).await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[sqlx::test]
#[test_log::test]
async fn test_unknown_customer_is_not_found(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let response = server.get(&format!("/api/v1/customers/{}", Uuid::new_v4())).await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Customer not found");
}

#[sqlx::test]
#[test_log::test]
async fn test_lists_never_leak_other_companies(pool: PgPool) {
    let alice = create_test_staff(&pool).await;
    let bob = create_test_staff(&pool).await;
    create_test_customer(&pool, alice.company.id, "Alice's Customer").await;
    create_test_customer(&pool, bob.company.id, "Bob's Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &alice.email).await;

    let response = server.get("/api/v1/customers").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Alice's Customer"]);
}

#[sqlx::test]
#[test_log::test]
async fn test_api_key_delete_is_tenant_scoped(pool: PgPool) {
    let alice = create_test_staff(&pool).await;
    let bob = create_test_staff(&pool).await;

    let server = create_test_app(pool.clone()).await;

    login(&server, &bob.email).await;
    let created = server
        .post("/api/v1/settings/api-keys")
        .json(&json!({"name": "Bob's key"}))
        .await;
    created.assert_status(axum::http::StatusCode::CREATED);
    let created: serde_json::Value = created.json();
    let key_id = created["data"]["id"].as_str().expect("id").to_string();
    // The secret is only ever shown on creation.
    assert!(created["data"]["secret"].as_str().expect("secret").starts_with("fsk-"));

    login(&server, &alice.email).await;
    let response = server.delete(&format!("/api/v1/settings/api-keys/{key_id}")).await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not authorized");
}

#[sqlx::test]
#[test_log::test]
async fn test_current_company_reflects_active_pointer(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let response = server.get("/api/v1/companies/current").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["name"], staff.company.name);
}

#[sqlx::test]
#[test_log::test]
async fn test_company_switch_requires_membership(pool: PgPool) {
    let alice = create_test_staff(&pool).await;
    let bob = create_test_staff(&pool).await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &alice.email).await;

    let response = server
        .post("/api/v1/companies/switch")
        .json(&json!({"companyId": bob.company.id}))
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[sqlx::test]
#[test_log::test]
async fn test_pagination_is_clamped(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    for i in 0..5 {
        create_test_customer(&pool, staff.company.id, &format!("Customer {i}")).await;
    }

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    // A negative skip and oversized limit degrade to the defaults.
    let response = server.get("/api/v1/customers?skip=-5&limit=100000").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"].as_array().expect("array").len(), 5);

    let response = server.get("/api/v1/customers?skip=2&limit=2").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"].as_array().expect("array").len(), 2);
}
