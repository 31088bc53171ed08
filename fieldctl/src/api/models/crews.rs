//! Crew wire models.

use crate::db::models::crews::{CrewCreateDBRequest, CrewDBResponse, CrewUpdateDBRequest};
use crate::types::{CrewId, TechnicianId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrewCreate {
    pub name: String,
    pub color: Option<String>,
}

impl From<CrewCreate> for CrewCreateDBRequest {
    fn from(create: CrewCreate) -> Self {
        Self {
            name: create.name,
            color: create.color,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrewUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl From<CrewUpdate> for CrewUpdateDBRequest {
    fn from(update: CrewUpdate) -> Self {
        Self {
            name: update.name,
            color: update.color,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrewMembersUpdate {
    #[schema(value_type = Vec<String>)]
    pub technician_ids: Vec<TechnicianId>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrewResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CrewId,
    pub name: String,
    pub color: Option<String>,
    #[schema(value_type = Vec<String>)]
    pub member_ids: Vec<TechnicianId>,
    pub created_at: DateTime<Utc>,
}

impl From<CrewDBResponse> for CrewResponse {
    fn from(crew: CrewDBResponse) -> Self {
        Self {
            id: crew.id,
            name: crew.name,
            color: crew.color,
            member_ids: crew.member_ids,
            created_at: crew.created_at,
        }
    }
}
