//! Shared fixtures for integration tests.

use crate::{
    auth::password,
    config::{Config, EmailConfig, EmailTransportConfig},
    db::{
        handlers::{Companies, Customers, Estimates, Invoices, Jobs, Repository, Technicians, Users},
        models::{
            companies::{CompanyCreateDBRequest, CompanyDBResponse, MemberRole},
            customers::{CustomerCreateDBRequest, CustomerDBResponse},
            estimates::{EstimateCreateDBRequest, EstimateDBResponse},
            invoices::{InvoiceCreateDBRequest, InvoiceDBResponse, InvoiceStatus, InvoiceUpdateDBRequest},
            jobs::{JobCreateDBRequest, JobDBResponse},
            technicians::{TechnicianCreateDBRequest, TechnicianDBResponse},
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    types::{CompanyId, CustomerId, JobId},
};
use axum_test::TestServer;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Password used for every seeded staff account.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

pub async fn create_test_app(pool: PgPool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    // Use temp directory for test emails
    let temp_dir = std::env::temp_dir().join(format!("fieldctl-test-emails-{}", std::process::id()));

    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        email: EmailConfig {
            transport: EmailTransportConfig::File {
                path: temp_dir.to_string_lossy().to_string(),
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A seeded staff account with its own company, ready to log in.
pub struct TestStaff {
    pub user: UserDBResponse,
    pub company: CompanyDBResponse,
    pub email: String,
}

pub async fn create_test_staff(pool: &PgPool) -> TestStaff {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let email = format!("owner_{}@example.com", Uuid::new_v4().simple());
    let password_hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    let user = Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            email: email.clone(),
            password_hash: Some(password_hash),
            display_name: Some("Test Owner".to_string()),
        })
        .await
        .expect("Failed to create test user");

    let company = Companies::new(&mut conn)
        .create(&CompanyCreateDBRequest {
            name: format!("Test Co {}", Uuid::new_v4().simple()),
        })
        .await
        .expect("Failed to create test company");

    Companies::new(&mut conn)
        .add_member(company.id, user.id, MemberRole::Owner)
        .await
        .expect("Failed to add owner membership");

    let user = Users::new(&mut conn)
        .set_active_company(user.id, Some(company.id))
        .await
        .expect("Failed to set active company");

    TestStaff { user, company, email }
}

/// Log the staff account in; the server saves the session cookie for
/// subsequent requests.
pub async fn login(server: &TestServer, email: &str) {
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({"email": email, "password": TEST_PASSWORD}))
        .await;
    response.assert_status_ok();
}

pub async fn create_test_customer(pool: &PgPool, company_id: CompanyId, name: &str) -> CustomerDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Customers::new(&mut conn)
        .create(
            company_id,
            &CustomerCreateDBRequest {
                name: name.to_string(),
                email: None,
                phone: None,
                address: None,
                notes: None,
            },
        )
        .await
        .expect("Failed to create test customer")
}

pub async fn create_test_technician(pool: &PgPool, company_id: CompanyId, name: &str) -> TechnicianDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Technicians::new(&mut conn)
        .create(
            company_id,
            &TechnicianCreateDBRequest {
                name: name.to_string(),
                email: None,
                phone: None,
            },
        )
        .await
        .expect("Failed to create test technician")
}

pub async fn create_test_job(pool: &PgPool, company_id: CompanyId, customer_id: CustomerId, title: &str) -> JobDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Jobs::new(&mut conn)
        .create(
            company_id,
            &JobCreateDBRequest {
                customer_id,
                crew_id: None,
                title: title.to_string(),
                description: None,
                status: None,
                scheduled_start: None,
                scheduled_end: None,
                total_cents: None,
            },
        )
        .await
        .expect("Failed to create test job")
}

pub async fn create_test_estimate(pool: &PgPool, company_id: CompanyId, customer_id: CustomerId, title: &str) -> EstimateDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Estimates::new(&mut conn)
        .create(
            company_id,
            &EstimateCreateDBRequest {
                customer_id,
                title: title.to_string(),
                total_cents: Some(125_00),
            },
        )
        .await
        .expect("Failed to create test estimate")
}

pub async fn create_test_invoice(
    pool: &PgPool,
    company_id: CompanyId,
    customer_id: CustomerId,
    job_id: Option<JobId>,
    amount_due_cents: i64,
    status: InvoiceStatus,
) -> InvoiceDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut repo = Invoices::new(&mut conn);
    let invoice = repo
        .create(
            company_id,
            &InvoiceCreateDBRequest {
                customer_id,
                job_id,
                amount_due_cents,
                due_date: None,
            },
        )
        .await
        .expect("Failed to create test invoice");

    if status == InvoiceStatus::Draft {
        return invoice;
    }
    repo.update(
        company_id,
        invoice.id,
        &InvoiceUpdateDBRequest {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to set test invoice status")
}
