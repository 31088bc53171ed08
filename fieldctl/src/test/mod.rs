//! End-to-end integration tests exercising the HTTP surface against a real
//! database.
//!
//! Each test gets its own migrated database from `#[sqlx::test]` and drives
//! the full router through [`crate::test_utils::create_test_app`], cookies
//! included.

pub mod auth_flow;
pub mod portal_access;
pub mod public_pages;
pub mod scheduling;
pub mod tenancy;
