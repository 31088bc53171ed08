//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction and provides
//! strongly-typed operations over one table, returning domain models from
//! [`crate::db::models`]. Company-scoped repositories implement the
//! [`Repository`] trait, which takes the caller's company id on every call;
//! the [`repository::OwnedEntity`] trait backs the authorization guard.
//!
//! # Common Pattern
//!
//! ```ignore
//! use fieldctl::db::handlers::{Customers, Repository};
//!
//! async fn example(pool: &sqlx::PgPool, company_id: uuid::Uuid) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Customers::new(&mut tx);
//!     let customers = repo.list(company_id, &Default::default()).await?;
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod api_keys;
pub mod arrival_windows;
pub mod companies;
pub mod consultations;
pub mod crews;
pub mod customers;
pub mod estimates;
pub mod invoices;
pub mod jobs;
pub mod repository;
pub mod technicians;
pub mod users;

pub use api_keys::ApiKeys;
pub use arrival_windows::ArrivalWindows;
pub use companies::Companies;
pub use consultations::Consultations;
pub use crews::Crews;
pub use customers::Customers;
pub use estimates::Estimates;
pub use invoices::Invoices;
pub use jobs::Jobs;
pub use repository::{OwnedEntity, Repository};
pub use technicians::Technicians;
pub use users::Users;
