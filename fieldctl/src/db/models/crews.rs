//! Database models for crews and crew membership.

use crate::types::{CompanyId, CrewId, TechnicianId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CrewCreateDBRequest {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CrewUpdateDBRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Crew with its technician membership resolved.
#[derive(Debug, Clone)]
pub struct CrewDBResponse {
    pub id: CrewId,
    pub company_id: CompanyId,
    pub name: String,
    pub color: Option<String>,
    pub member_ids: Vec<TechnicianId>,
    pub created_at: DateTime<Utc>,
}
