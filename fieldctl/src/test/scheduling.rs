//! Jobs, crews, and arrival windows through the HTTP surface.

use crate::test_utils::{create_test_app, create_test_customer, create_test_staff, create_test_technician, login};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
#[test_log::test]
async fn test_job_cannot_reference_foreign_customer(pool: PgPool) {
    let alice = create_test_staff(&pool).await;
    let bob = create_test_staff(&pool).await;
    let foreign = create_test_customer(&pool, bob.company.id, "Bob's Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &alice.email).await;

    let response = server
        .post("/api/v1/jobs")
        .json(&json!({"customerId": foreign.id, "title": "Sneaky job"}))
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[sqlx::test]
#[test_log::test]
async fn test_job_schedule_must_be_ordered(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Timely Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let response = server
        .post("/api/v1/jobs")
        .json(&json!({
            "customerId": customer.id,
            "title": "Backwards job",
            "scheduledStart": "2026-09-02T14:00:00Z",
            "scheduledEnd": "2026-09-02T09:00:00Z"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Scheduled end cannot be before scheduled start");
}

#[sqlx::test]
#[test_log::test]
async fn test_job_status_filter(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Filter Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let created = server
        .post("/api/v1/jobs")
        .json(&json!({"customerId": customer.id, "title": "Open job"}))
        .await;
    created.assert_status(axum::http::StatusCode::CREATED);
    let created: serde_json::Value = created.json();
    let job_id = created["data"]["id"].as_str().expect("id").to_string();

    server
        .post("/api/v1/jobs")
        .json(&json!({"customerId": customer.id, "title": "Other job"}))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    server
        .put(&format!("/api/v1/jobs/{job_id}"))
        .json(&json!({"status": "completed"}))
        .await
        .assert_status_ok();

    let response = server.get("/api/v1/jobs?status=completed").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let jobs = body["data"].as_array().expect("array");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "Open job");
}

#[sqlx::test]
#[test_log::test]
async fn test_crew_membership_is_replaced_wholesale(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let tech_a = create_test_technician(&pool, staff.company.id, "Tech A").await;
    let tech_b = create_test_technician(&pool, staff.company.id, "Tech B").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let crew = server.post("/api/v1/crews").json(&json!({"name": "Bravo"})).await;
    crew.assert_status(axum::http::StatusCode::CREATED);
    let crew: serde_json::Value = crew.json();
    let crew_id = crew["data"]["id"].as_str().expect("id").to_string();

    let response = server
        .put(&format!("/api/v1/crews/{crew_id}/members"))
        .json(&json!({"technicianIds": [tech_a.id, tech_b.id]}))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["memberIds"].as_array().expect("array").len(), 2);

    // The next save is a full replacement, not a merge.
    let response = server
        .put(&format!("/api/v1/crews/{crew_id}/members"))
        .json(&json!({"technicianIds": [tech_b.id]}))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let members = body["data"]["memberIds"].as_array().expect("array");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0], json!(tech_b.id));
}

#[sqlx::test]
#[test_log::test]
async fn test_deleting_crew_detaches_its_jobs(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let customer = create_test_customer(&pool, staff.company.id, "Crew Customer").await;

    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let crew = server.post("/api/v1/crews").json(&json!({"name": "Doomed"})).await;
    let crew: serde_json::Value = crew.json();
    let crew_id = crew["data"]["id"].as_str().expect("id").to_string();

    let job = server
        .post("/api/v1/jobs")
        .json(&json!({"customerId": customer.id, "crewId": crew_id, "title": "Orphaned job"}))
        .await;
    job.assert_status(axum::http::StatusCode::CREATED);
    let job: serde_json::Value = job.json();
    let job_id = job["data"]["id"].as_str().expect("id").to_string();

    server
        .delete(&format!("/api/v1/crews/{crew_id}"))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    // The job survives without a crew.
    let detail = server.get(&format!("/api/v1/jobs/{job_id}")).await;
    detail.assert_status_ok();
    let detail: serde_json::Value = detail.json();
    assert_eq!(detail["data"]["title"], "Orphaned job");
    assert!(detail["data"]["crewId"].is_null());
}

#[sqlx::test]
#[test_log::test]
async fn test_arrival_windows_replace_all(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    let response = server
        .put("/api/v1/settings/arrival-windows")
        .json(&json!({"windows": [
            {"label": "Morning", "startTime": "08:00", "endTime": "10:00"},
            {"label": "Afternoon", "startTime": "12:00", "endTime": "15:00"}
        ]}))
        .await;
    response.assert_status_ok();

    let response = server
        .put("/api/v1/settings/arrival-windows")
        .json(&json!({"windows": [
            {"label": "All day", "startTime": "08:00", "endTime": "17:00"}
        ]}))
        .await;
    response.assert_status_ok();

    let listed = server.get("/api/v1/settings/arrival-windows").await;
    listed.assert_status_ok();
    let body: serde_json::Value = listed.json();
    let windows = body["data"].as_array().expect("array");
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0]["label"], "All day");
}

#[sqlx::test]
#[test_log::test]
async fn test_invalid_window_rejects_whole_save(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    server
        .put("/api/v1/settings/arrival-windows")
        .json(&json!({"windows": [{"label": "Morning", "startTime": "08:00", "endTime": "10:00"}]}))
        .await
        .assert_status_ok();

    // One bad window rejects the whole list and leaves the old set in place.
    let response = server
        .put("/api/v1/settings/arrival-windows")
        .json(&json!({"windows": [
            {"label": "Evening", "startTime": "17:00", "endTime": "20:00"},
            {"label": "", "startTime": "08:00", "endTime": "10:00"}
        ]}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Each window must have a label, start time, and end time");

    let listed = server.get("/api/v1/settings/arrival-windows").await;
    let body: serde_json::Value = listed.json();
    let windows = body["data"].as_array().expect("array");
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0]["label"], "Morning");
}

#[sqlx::test]
#[test_log::test]
async fn test_window_with_absent_field_rejects_whole_save(pool: PgPool) {
    let staff = create_test_staff(&pool).await;
    let server = create_test_app(pool.clone()).await;
    login(&server, &staff.email).await;

    server
        .put("/api/v1/settings/arrival-windows")
        .json(&json!({"windows": [{"label": "Morning", "startTime": "08:00", "endTime": "10:00"}]}))
        .await
        .assert_status_ok();

    // A window that leaves endTime out entirely gets the same validation
    // error as an empty one, not a deserialization failure.
    let response = server
        .put("/api/v1/settings/arrival-windows")
        .json(&json!({"windows": [{"label": "Morning", "startTime": "08:00"}]}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Each window must have a label, start time, and end time");

    let listed = server.get("/api/v1/settings/arrival-windows").await;
    let body: serde_json::Value = listed.json();
    let windows = body["data"].as_array().expect("array");
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0]["endTime"], "10:00");
}
