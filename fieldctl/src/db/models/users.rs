//! Database models for auth identities.

use crate::types::{CompanyId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a new auth identity
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub email: String,
    pub password_hash: Option<String>,
    pub display_name: Option<String>,
}

/// Database response for an auth identity. Never carries the password hash;
/// login verification goes through [`UserAuthDBResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub active_company_id: Option<CompanyId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential row loaded only by the login path.
#[derive(Debug, Clone, FromRow)]
pub struct UserAuthDBResponse {
    pub id: UserId,
    pub email: String,
    pub password_hash: Option<String>,
    pub is_active: bool,
}
