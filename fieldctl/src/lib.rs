//! # fieldctl: control plane for field-service businesses
//!
//! `fieldctl` is a multi-tenant management API for field-service companies:
//! customers, technicians, crews, scheduled jobs, estimates, invoices, and
//! video consultations, plus self-service portals for customers and
//! technicians and public token-addressed pages for shared estimates.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) with
//! PostgreSQL for all persistence.
//!
//! Every tenant-scoped request flows through the same pipeline:
//!
//! 1. **Session resolution** ([`auth::principal`]): the HTTP-only session
//!    cookie resolves to one of three principal shapes - staff, customer, or
//!    technician. The principal carries its company id.
//! 2. **Ownership guard** ([`auth::guard`]): routes that address an entity by
//!    id verify the entity belongs to the principal's company before touching
//!    it. An entity that does not exist yields 404; one owned by another
//!    company yields 403.
//! 3. **Repositories** ([`db::handlers`]): every query takes the company id
//!    explicitly. There is no unscoped variant to call by accident.
//! 4. **Response shaping** ([`api::models`], [`cache`]): responses wrap in a
//!    `{"data": ...}` envelope, list endpoints clamp pagination, and GET
//!    responses carry cache-control headers.
//!
//! Public pages (`/p/*`) skip sessions entirely: the unguessable share token
//! in the URL is the capability.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use fieldctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = fieldctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     fieldctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
mod cache;
pub mod config;
mod crypto;
pub mod db;
mod email;
pub mod errors;
mod openapi;
mod services;
pub mod telemetry;
mod types;

#[cfg(test)]
mod test;
#[cfg(test)]
pub mod test_utils;

use crate::openapi::ApiDoc;
use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{
    ApiKeyId, CompanyId, ConsultationId, CrewId, CustomerId, EstimateId, InvoiceId, JobId,
    TechnicianId, UserId,
};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the fieldctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials)
        .allow_methods(tower_http::cors::AllowMethods::mirror_request())
        .allow_headers(tower_http::cors::AllowHeaders::mirror_request()))
}

/// Build the application router with all endpoints and middleware.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers;

    let api_routes = Router::new()
        // Authentication and identity
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/change-password", post(handlers::auth::change_password))
        // Tenants
        .route("/companies", get(handlers::companies::list_companies))
        .route("/companies", post(handlers::companies::create_company))
        .route("/companies/current", get(handlers::companies::get_current_company))
        .route("/companies/switch", post(handlers::companies::switch_company))
        // Customers
        .route("/customers", get(handlers::customers::list_customers))
        .route("/customers", post(handlers::customers::create_customer))
        .route("/customers/{id}", get(handlers::customers::get_customer))
        .route("/customers/{id}", put(handlers::customers::update_customer))
        .route("/customers/{id}", delete(handlers::customers::delete_customer))
        .route("/customers/{id}/portal-invite", post(handlers::portal::invite_customer))
        .route("/customers/{id}/portal-access", delete(handlers::portal::revoke_customer_access))
        // Technicians
        .route("/technicians", get(handlers::technicians::list_technicians))
        .route("/technicians", post(handlers::technicians::create_technician))
        .route("/technicians/{id}", get(handlers::technicians::get_technician))
        .route("/technicians/{id}", put(handlers::technicians::update_technician))
        .route("/technicians/{id}", delete(handlers::technicians::delete_technician))
        .route("/technicians/{id}/portal-invite", post(handlers::portal::invite_technician))
        .route(
            "/technicians/{id}/portal-access",
            delete(handlers::portal::revoke_technician_access),
        )
        // Crews
        .route("/crews", get(handlers::crews::list_crews))
        .route("/crews", post(handlers::crews::create_crew))
        .route("/crews/{id}", get(handlers::crews::get_crew))
        .route("/crews/{id}", put(handlers::crews::update_crew))
        .route("/crews/{id}", delete(handlers::crews::delete_crew))
        .route("/crews/{id}/members", put(handlers::crews::set_crew_members))
        // Jobs
        .route("/jobs", get(handlers::jobs::list_jobs))
        .route("/jobs", post(handlers::jobs::create_job))
        .route("/jobs/{id}", get(handlers::jobs::get_job))
        .route("/jobs/{id}", put(handlers::jobs::update_job))
        .route("/jobs/{id}", delete(handlers::jobs::delete_job))
        // Estimates
        .route("/estimates", get(handlers::estimates::list_estimates))
        .route("/estimates", post(handlers::estimates::create_estimate))
        .route("/estimates/{id}", get(handlers::estimates::get_estimate))
        .route("/estimates/{id}", put(handlers::estimates::update_estimate))
        .route("/estimates/{id}", delete(handlers::estimates::delete_estimate))
        .route("/estimates/{id}/send", post(handlers::estimates::send_estimate))
        // Invoices
        .route("/invoices", get(handlers::invoices::list_invoices))
        .route("/invoices", post(handlers::invoices::create_invoice))
        .route("/invoices/{id}", get(handlers::invoices::get_invoice))
        .route("/invoices/{id}", put(handlers::invoices::update_invoice))
        .route("/invoices/{id}", delete(handlers::invoices::delete_invoice))
        // Consultations
        .route("/consultations", get(handlers::consultations::list_consultations))
        .route("/consultations", post(handlers::consultations::create_consultation))
        .route("/consultations/{id}", get(handlers::consultations::get_consultation))
        .route("/consultations/{id}", delete(handlers::consultations::delete_consultation))
        // Settings
        .route("/settings/arrival-windows", get(handlers::settings::list_arrival_windows))
        .route("/settings/arrival-windows", put(handlers::settings::save_arrival_windows))
        .route("/settings/api-keys", get(handlers::api_keys::list_api_keys))
        .route("/settings/api-keys", post(handlers::api_keys::create_api_key))
        .route("/settings/api-keys/{id}", delete(handlers::api_keys::delete_api_key))
        // Portals
        .route("/portal/dashboard", get(handlers::portal::customer_dashboard))
        .route("/portal/jobs", get(handlers::portal::portal_jobs))
        .route("/portal/estimates", get(handlers::portal::portal_estimates))
        .route("/portal/invoices", get(handlers::portal::portal_invoices))
        .route("/portal/schedule", get(handlers::portal::technician_schedule));

    // Public token-addressed pages, outside the versioned API
    let public_routes = Router::new()
        .route("/p/estimates/{token}", get(handlers::public::public_estimate))
        .route("/p/estimates/{token}/sign", post(handlers::public::sign_public_estimate))
        .route("/p/consultations/{token}", get(handlers::public::public_consultation));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", api_routes)
        .merge(public_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, and builds the router
/// 2. **Serve**: [`Application::serve`] binds the TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application on an existing pool. Used by tests, where the
    /// harness owns the database and migrations have already been applied.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        let pool = match pool {
            Some(pool) => pool,
            None => {
                let database_url = config
                    .database_url
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("database_url is required"))?;
                let pool = PgPool::connect(&database_url).await?;
                migrator().run(&pool).await?;
                pool
            }
        };

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .build(self.router)
            .expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "fieldctl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
