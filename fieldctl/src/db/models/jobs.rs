//! Database models for jobs.

use crate::types::{CompanyId, CrewId, CustomerId, JobId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
    Canceled,
}

#[derive(Debug, Clone)]
pub struct JobCreateDBRequest {
    pub customer_id: CustomerId,
    pub crew_id: Option<CrewId>,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub total_cents: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct JobUpdateDBRequest {
    pub crew_id: Option<Option<CrewId>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
    pub scheduled_start: Option<Option<DateTime<Utc>>>,
    pub scheduled_end: Option<Option<DateTime<Utc>>>,
    pub total_cents: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobDBResponse {
    pub id: JobId,
    pub company_id: CompanyId,
    pub customer_id: CustomerId,
    pub crew_id: Option<CrewId>,
    pub title: String,
    pub description: Option<String>,
    pub status: JobStatus,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub total_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
