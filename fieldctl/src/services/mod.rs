//! Outbound integrations with third-party services.
//!
//! Both integrations are best-effort: a failure never fails the request
//! that triggered it.

pub mod geocode;
pub mod video;
