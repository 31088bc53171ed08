//! Database models for estimates.

use crate::types::{CompanyId, CustomerId, EstimateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstimateStatus {
    Draft,
    Sent,
    Approved,
    Declined,
}

#[derive(Debug, Clone)]
pub struct EstimateCreateDBRequest {
    pub customer_id: CustomerId,
    pub title: String,
    pub total_cents: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct EstimateUpdateDBRequest {
    pub title: Option<String>,
    pub status: Option<EstimateStatus>,
    pub total_cents: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EstimateDBResponse {
    pub id: EstimateId,
    pub company_id: CompanyId,
    pub customer_id: CustomerId,
    pub title: String,
    pub status: EstimateStatus,
    pub total_cents: Option<i64>,
    pub share_token: Option<String>,
    pub signed_by: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
