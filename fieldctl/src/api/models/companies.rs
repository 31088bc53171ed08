//! Company (tenant) wire models.

use crate::db::models::companies::CompanyDBResponse;
use crate::types::CompanyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCreate {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchCompanyRequest {
    #[schema(value_type = String, format = "uuid")]
    pub company_id: CompanyId,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CompanyId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<CompanyDBResponse> for CompanyResponse {
    fn from(company: CompanyDBResponse) -> Self {
        Self {
            id: company.id,
            name: company.name,
            created_at: company.created_at,
        }
    }
}
