//! HTTP request handlers for all API endpoints.
//!
//! Each handler validates the request, resolves the calling principal,
//! runs the ownership guard where a path carries an entity id, and then
//! executes against the database repositories.
//!
//! # Handler Modules
//!
//! - [`auth`]: Login, signup, logout, and password changes
//! - [`companies`]: Tenant creation, listing, and switching
//! - [`customers`]: Customer CRUD plus background geocoding
//! - [`technicians`]: Technician CRUD
//! - [`crews`]: Crew CRUD, membership replacement, detach-on-delete
//! - [`jobs`]: Job CRUD with cross-reference ownership checks
//! - [`estimates`]: Estimate CRUD and the send transition
//! - [`invoices`]: Invoice CRUD
//! - [`consultations`]: Consultation create/list/delete with video rooms
//! - [`api_keys`]: API key management under settings
//! - [`settings`]: Arrival window list replacement
//! - [`portal`]: Portal invites/revocations and portal-facing reads
//! - [`public`]: Token-addressed estimate and consultation pages

pub mod api_keys;
pub mod auth;
pub mod companies;
pub mod consultations;
pub mod crews;
pub mod customers;
pub mod estimates;
pub mod invoices;
pub mod jobs;
pub mod portal;
pub mod public;
pub mod settings;
pub mod technicians;
