//! Technician wire models.

use crate::db::models::technicians::{TechnicianCreateDBRequest, TechnicianDBResponse, TechnicianUpdateDBRequest};
use crate::types::TechnicianId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<TechnicianCreate> for TechnicianCreateDBRequest {
    fn from(create: TechnicianCreate) -> Self {
        Self {
            name: create.name,
            email: create.email,
            phone: create.phone,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

impl From<TechnicianUpdate> for TechnicianUpdateDBRequest {
    fn from(update: TechnicianUpdate) -> Self {
        Self {
            name: update.name,
            email: update.email,
            phone: update.phone,
            is_active: update.is_active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: TechnicianId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub has_portal_access: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TechnicianDBResponse> for TechnicianResponse {
    fn from(technician: TechnicianDBResponse) -> Self {
        Self {
            id: technician.id,
            name: technician.name,
            email: technician.email,
            phone: technician.phone,
            is_active: technician.is_active,
            has_portal_access: technician.portal_user_id.is_some(),
            created_at: technician.created_at,
            updated_at: technician.updated_at,
        }
    }
}
