//! Database models for companies (tenants) and membership rows.

use crate::types::{CompanyId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Role a user holds within one company. Staff roles access the dashboard;
/// portal roles exist so revocation can delete exactly one membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Staff,
    Customer,
    Technician,
}

#[derive(Debug, Clone)]
pub struct CompanyCreateDBRequest {
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CompanyDBResponse {
    pub id: CompanyId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CompanyMemberDBResponse {
    pub company_id: CompanyId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}
