//! Database record structures matching table schemas.

pub mod api_keys;
pub mod arrival_windows;
pub mod companies;
pub mod consultations;
pub mod crews;
pub mod customers;
pub mod estimates;
pub mod invoices;
pub mod jobs;
pub mod technicians;
pub mod users;
