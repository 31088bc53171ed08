//! Database models for arrival windows.

use crate::types::CompanyId;
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One window in a replace-all save. Position comes from list order.
#[derive(Debug, Clone)]
pub struct ArrivalWindowDBRequest {
    pub label: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct ArrivalWindowDBResponse {
    pub id: Uuid,
    pub company_id: CompanyId,
    pub label: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}
