//! Portal invite/revoke lifecycle and the portal-facing read endpoints.

use crate::{
    db::models::invoices::InvoiceStatus,
    test_utils::{
        create_test_app, create_test_customer, create_test_estimate, create_test_invoice, create_test_job, create_test_staff,
        create_test_technician, login,
    },
};
use serde_json::json;
use sqlx::PgPool;

/// Invite a customer and return the portal account's (email, temp password).
async fn invite_customer(server: &axum_test::TestServer, customer_id: uuid::Uuid) -> (String, String) {
    let response = server
        .post(&format!("/api/v1/customers/{customer_id}/portal-invite"))
        .json(&json!({"email": format!("portal_{customer_id}@example.com")}))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    (
        body["data"]["email"].as_str().expect("email").to_string(),
        body["data"]["tempPassword"].as_str().expect("temp password").to_string(),
    )
}

#[sqlx::test]
#[test_log::test]
async fn test_customer_invite_then_portal_login(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Portal Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;
    let (email, temp_password) = invite_customer(&server, customer.id).await;

    // The customer record now reports portal access.
    let detail = server.get(&format!("/api/v1/customers/{}", customer.id)).await;
    let detail: serde_json::Value = detail.json();
    assert_eq!(detail["data"]["hasPortalAccess"], true);

    // Fresh session as the portal user.
    let portal = create_test_app(pool.clone()).await;
    let response = portal
        .post("/api/v1/auth/login")
        .json(&json!({"email": email, "password": temp_password}))
        .await;
    response.assert_status_ok();

    let dashboard = portal.get("/api/v1/portal/dashboard").await;
    dashboard.assert_status_ok();
    let body: serde_json::Value = dashboard.json();
    assert_eq!(body["data"]["upcomingJobs"], 0);
    assert_eq!(body["data"]["openInvoices"], 0);
    assert_eq!(body["data"]["outstandingCents"], 0);
    assert_eq!(body["data"]["paidCents"], 0);
    assert_eq!(body["data"]["pendingEstimates"], 0);
}

#[sqlx::test]
#[test_log::test]
async fn test_invite_without_email_anywhere_rejected(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    // Customer has no email on file and the request carries none either.
    let customer = create_test_customer(&pool, staff.company.id, "No Email").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let response = server
        .post(&format!("/api/v1/customers/{}/portal-invite", customer.id))
        .json(&json!({}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "An email address is required to grant portal access");
}

#[sqlx::test]
#[test_log::test]
async fn test_revoke_deletes_orphaned_identity(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Portal Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;
    let (email, temp_password) = invite_customer(&server, customer.id).await;

    let response = server
        .delete(&format!("/api/v1/customers/{}/portal-access", customer.id))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["revoked"], true);

    // The identity had no other memberships, so it is gone entirely.
    let portal = create_test_app(pool.clone()).await;
    let response = portal
        .post("/api/v1/auth/login")
        .json(&json!({"email": email, "password": temp_password}))
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    // Revoking twice is a client error, not a silent success.
    let response = server
        .delete(&format!("/api/v1/customers/{}/portal-access", customer.id))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No portal access");
}

#[sqlx::test]
#[test_log::test]
async fn test_portal_dashboard_aggregates(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Busy Customer").await;
    let job = create_test_job(&pool, staff.company.id, customer.id, "Roof repair").await;
    create_test_invoice(&pool, staff.company.id, customer.id, Some(job.id), 250_00, InvoiceStatus::Sent).await;
    create_test_invoice(&pool, staff.company.id, customer.id, None, 100_00, InvoiceStatus::Draft).await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;
    let (email, temp_password) = invite_customer(&server, customer.id).await;

    // Send an estimate so it counts as pending.
    let estimate = create_test_estimate(&pool, staff.company.id, customer.id, "New gutters").await;
    server
        .post(&format!("/api/v1/estimates/{}/send", estimate.id))
        .await
        .assert_status_ok();

    let portal = create_test_app(pool.clone()).await;
    portal
        .post("/api/v1/auth/login")
        .json(&json!({"email": email, "password": temp_password}))
        .await
        .assert_status_ok();

    let dashboard = portal.get("/api/v1/portal/dashboard").await;
    dashboard.assert_status_ok();
    let body: serde_json::Value = dashboard.json();
    assert_eq!(body["data"]["upcomingJobs"], 1);
    assert_eq!(body["data"]["pendingEstimates"], 1);
    assert_eq!(body["data"]["openInvoices"], 1);
    assert_eq!(body["data"]["outstandingCents"], 250_00);

    // Draft invoices stay invisible in the portal list as well.
    let invoices = portal.get("/api/v1/portal/invoices").await;
    invoices.assert_status_ok();
    let body: serde_json::Value = invoices.json();
    assert_eq!(body["data"].as_array().expect("array").len(), 1);

    // Staff endpoints stay closed to portal sessions.
    let customers = portal.get("/api/v1/customers").await;
    customers.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
#[test_log::test]
async fn test_technician_invite_and_schedule(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let technician = create_test_technician(&pool, staff.company.id, "Tess Wrench").await;
    let customer = create_test_customer(&pool, staff.company.id, "Schedule Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let response = server
        .post(&format!("/api/v1/technicians/{}/portal-invite", technician.id))
        .json(&json!({"email": "tess@example.com"}))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let temp_password = body["data"]["tempPassword"].as_str().expect("temp password").to_string();

    // Put the technician on a crew and give that crew a job.
    let crew = server.post("/api/v1/crews").json(&json!({"name": "Alpha"})).await;
    crew.assert_status(axum::http::StatusCode::CREATED);
    let crew: serde_json::Value = crew.json();
    let crew_id = crew["data"]["id"].as_str().expect("id").to_string();

    server
        .put(&format!("/api/v1/crews/{crew_id}/members"))
        .json(&json!({"technicianIds": [technician.id]}))
        .await
        .assert_status_ok();

    server
        .post("/api/v1/jobs")
        .json(&json!({"customerId": customer.id, "crewId": crew_id, "title": "Water heater swap"}))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let portal = create_test_app(pool.clone()).await;
    portal
        .post("/api/v1/auth/login")
        .json(&json!({"email": "tess@example.com", "password": temp_password}))
        .await
        .assert_status_ok();

    let schedule = portal.get("/api/v1/portal/schedule").await;
    schedule.assert_status_ok();
    let body: serde_json::Value = schedule.json();
    let jobs = body["data"].as_array().expect("array");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "Water heater swap");

    // A technician session is not a customer session.
    let dashboard = portal.get("/api/v1/portal/dashboard").await;
    dashboard.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
#[test_log::test]
async fn test_reinvite_existing_identity_returns_no_temp_password(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Repeat Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;
    let (email, _) = invite_customer(&server, customer.id).await;

    let response = server
        .post(&format!("/api/v1/customers/{}/portal-invite", customer.id))
        .json(&json!({"email": email}))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["data"]["tempPassword"].is_null());
}
