//! Token-addressed public pages: shared estimates and consultation joins.

use crate::test_utils::{create_test_app, create_test_customer, create_test_estimate, create_test_staff, login};
use serde_json::json;
use sqlx::PgPool;

async fn send_estimate(server: &axum_test::TestServer, estimate_id: uuid::Uuid) -> String {
    let response = server.post(&format!("/api/v1/estimates/{estimate_id}/send")).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["status"], "sent");
    body["data"]["shareToken"].as_str().expect("share token").to_string()
}

#[sqlx::test]
#[test_log::test]
async fn test_shared_estimate_is_publicly_readable(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Share Customer").await;
    let estimate = create_test_estimate(&pool, staff.company.id, customer.id, "Fence install").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;
    let token = send_estimate(&server, estimate.id).await;

    // No session needed on the public page.
    let public = create_test_app(pool.clone()).await;
    let response = public.get(&format!("/p/estimates/{token}")).await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get("cache-control").expect("cache-control header"),
        "public, max-age=300, stale-while-revalidate=600"
    );
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["title"], "Fence install");
    assert_eq!(body["data"]["status"], "sent");
}

#[sqlx::test]
#[test_log::test]
async fn test_unknown_token_is_a_plain_404(pool: PgPool) {
    let server = create_test_app(pool.clone()).await;

    let response = server.get("/p/estimates/not-a-real-token").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Page not found");
}

#[sqlx::test]
#[test_log::test]
async fn test_signing_flow(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Signer").await;
    let estimate = create_test_estimate(&pool, staff.company.id, customer.id, "Deck rebuild").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;
    let token = send_estimate(&server, estimate.id).await;

    let public = create_test_app(pool.clone()).await;

    // Blank names are rejected before any lookup.
    let response = public
        .post(&format!("/p/estimates/{token}/sign"))
        .json(&json!({"signedBy": "   "}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "A name is required to sign");

    let response = public
        .post(&format!("/p/estimates/{token}/sign"))
        .json(&json!({"signedBy": "Pat Homeowner"}))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["signedBy"], "Pat Homeowner");

    // A second signature attempt is a clear client error.
    let response = public
        .post(&format!("/p/estimates/{token}/sign"))
        .json(&json!({"signedBy": "Someone Else"}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "This estimate has already been signed");

    // The staff view reflects the approval.
    let detail = server.get(&format!("/api/v1/estimates/{}", estimate.id)).await;
    detail.assert_status_ok();
    let detail: serde_json::Value = detail.json();
    assert_eq!(detail["data"]["status"], "approved");
    assert_eq!(detail["data"]["signedBy"], "Pat Homeowner");
}

#[sqlx::test]
#[test_log::test]
async fn test_resend_rotates_the_share_token(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Rotate Customer").await;
    let estimate = create_test_estimate(&pool, staff.company.id, customer.id, "Siding quote").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;
    let first = send_estimate(&server, estimate.id).await;
    let second = send_estimate(&server, estimate.id).await;
    assert_ne!(first, second);

    // The superseded link is dead.
    let public = create_test_app(pool.clone()).await;
    public
        .get(&format!("/p/estimates/{first}"))
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
    public.get(&format!("/p/estimates/{second}")).await.assert_status_ok();
}

#[sqlx::test]
#[test_log::test]
async fn test_approved_estimate_cannot_be_resent(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Done Customer").await;
    let estimate = create_test_estimate(&pool, staff.company.id, customer.id, "Finished work").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;
    let token = send_estimate(&server, estimate.id).await;

    let public = create_test_app(pool.clone()).await;
    public
        .post(&format!("/p/estimates/{token}/sign"))
        .json(&json!({"signedBy": "Pat"}))
        .await
        .assert_status_ok();

    let response = server.post(&format!("/api/v1/estimates/{}/send", estimate.id)).await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Only draft or sent estimates can be sent");
}

#[sqlx::test]
#[test_log::test]
async fn test_consultation_join_page(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let created = server
        .post("/api/v1/consultations")
        .json(&json!({"customerName": "Walk-in Lead"}))
        .await;
    created.assert_status(axum::http::StatusCode::CREATED);
    let created: serde_json::Value = created.json();
    let token = created["data"]["shareToken"].as_str().expect("share token").to_string();

    let public = create_test_app(pool.clone()).await;
    let response = public.get(&format!("/p/consultations/{token}")).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["customerName"], "Walk-in Lead");
}
