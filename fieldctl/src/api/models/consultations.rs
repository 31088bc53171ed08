//! Consultation wire models.

use crate::db::models::consultations::ConsultationDBResponse;
use crate::types::ConsultationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationCreate {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ConsultationId,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub share_token: String,
    pub video_room_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ConsultationDBResponse> for ConsultationResponse {
    fn from(consultation: ConsultationDBResponse) -> Self {
        Self {
            id: consultation.id,
            customer_name: consultation.customer_name,
            customer_email: consultation.customer_email,
            scheduled_at: consultation.scheduled_at,
            share_token: consultation.share_token,
            video_room_url: consultation.video_room_url,
            created_at: consultation.created_at,
        }
    }
}

/// Public join-page view. Exposes only what the join page renders.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicConsultationResponse {
    pub customer_name: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub video_room_url: Option<String>,
}

impl From<ConsultationDBResponse> for PublicConsultationResponse {
    fn from(consultation: ConsultationDBResponse) -> Self {
        Self {
            customer_name: consultation.customer_name,
            scheduled_at: consultation.scheduled_at,
            video_room_url: consultation.video_room_url,
        }
    }
}
