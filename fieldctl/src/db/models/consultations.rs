//! Database models for video consultations.

use crate::types::{CompanyId, ConsultationId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct ConsultationCreateDBRequest {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub share_token: String,
    pub video_room_name: Option<String>,
    pub video_room_url: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ConsultationDBResponse {
    pub id: ConsultationId,
    pub company_id: CompanyId,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub share_token: String,
    pub video_room_name: Option<String>,
    pub video_room_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
