//! Database models for API keys.

use crate::types::{ApiKeyId, CompanyId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct ApiKeyCreateDBRequest {
    pub name: String,
    pub secret: String,
    pub created_by: UserId,
}

/// Full key row, including the secret. Returned only from create; list
/// responses go through the API layer which redacts the secret.
#[derive(Debug, Clone, FromRow)]
pub struct ApiKeyDBResponse {
    pub id: ApiKeyId,
    pub company_id: CompanyId,
    pub name: String,
    pub secret: String,
    pub created_by: UserId,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
