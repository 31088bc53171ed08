//! API request/response models.
//!
//! Wire DTOs are camelCase and never expose another tenant's identifiers.
//! Success bodies are wrapped in [`common::Data`]; errors serialize as
//! `{"error": "..."}` from [`crate::errors::Error`].

pub mod api_keys;
pub mod auth;
pub mod common;
pub mod companies;
pub mod consultations;
pub mod crews;
pub mod customers;
pub mod estimates;
pub mod invoices;
pub mod jobs;
pub mod portal;
pub mod settings;
pub mod technicians;
