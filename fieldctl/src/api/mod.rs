//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/api/v1/auth/*`): Login, signup, session management
//! - **Companies** (`/api/v1/companies/*`): Tenant creation and switching
//! - **Staff resources** (`/api/v1/customers/*`, `/technicians/*`, `/crews/*`,
//!   `/jobs/*`, `/estimates/*`, `/invoices/*`, `/consultations/*`): tenant-scoped
//!   CRUD behind a staff session
//! - **Settings** (`/api/v1/settings/*`): arrival windows and API keys
//! - **Portals** (`/api/v1/portal/*`): customer and technician portal reads
//! - **Public** (`/p/*`): token-addressed estimate and consultation pages
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`;
//! the rendered documentation is served at `/docs`.

pub mod handlers;
pub mod models;
