//! Job wire models.

use crate::db::models::jobs::{JobCreateDBRequest, JobDBResponse, JobStatus, JobUpdateDBRequest};
use crate::types::{CrewId, CustomerId, JobId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCreate {
    #[schema(value_type = String, format = "uuid")]
    pub customer_id: CustomerId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub crew_id: Option<CrewId>,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub total_cents: Option<i64>,
}

impl From<JobCreate> for JobCreateDBRequest {
    fn from(create: JobCreate) -> Self {
        Self {
            customer_id: create.customer_id,
            crew_id: create.crew_id,
            title: create.title,
            description: create.description,
            status: create.status,
            scheduled_start: create.scheduled_start,
            scheduled_end: create.scheduled_end,
            total_cents: create.total_cents,
        }
    }
}

/// Nullable fields use double options: absent leaves the value alone,
/// explicit null clears it.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub crew_id: Option<Option<CrewId>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub scheduled_start: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub scheduled_end: Option<Option<DateTime<Utc>>>,
    pub total_cents: Option<i64>,
}

impl From<JobUpdate> for JobUpdateDBRequest {
    fn from(update: JobUpdate) -> Self {
        Self {
            crew_id: update.crew_id,
            title: update.title,
            description: update.description,
            status: update.status,
            scheduled_start: update.scheduled_start,
            scheduled_end: update.scheduled_end,
            total_cents: update.total_cents,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    #[param(value_type = Option<String>, format = "uuid")]
    pub customer_id: Option<CustomerId>,
    #[param(value_type = Option<String>, format = "uuid")]
    pub crew_id: Option<CrewId>,
    pub status: Option<JobStatus>,
    /// Include only jobs starting at or after this instant
    pub from: Option<DateTime<Utc>>,
    /// Include only jobs starting at or before this instant
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: JobId,
    #[schema(value_type = String, format = "uuid")]
    pub customer_id: CustomerId,
    #[schema(value_type = Option<String>, format = "uuid")]
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

impl From<JobDBResponse> for JobResponse {
    fn from(job: JobDBResponse) -> Self {
        Self {
            id: job.id,
            customer_id: job.customer_id,
            crew_id: job.crew_id,
            title: job.title,
            description: job.description,
            status: job.status,
            scheduled_start: job.scheduled_start,
            scheduled_end: job.scheduled_end,
            total_cents: job.total_cents,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
