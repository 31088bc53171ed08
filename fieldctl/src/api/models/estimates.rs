//! Estimate wire models.

use crate::db::models::estimates::{EstimateCreateDBRequest, EstimateDBResponse, EstimateStatus, EstimateUpdateDBRequest};
use crate::types::{CustomerId, EstimateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimateCreate {
    #[schema(value_type = String, format = "uuid")]
    pub customer_id: CustomerId,
    pub title: String,
    pub total_cents: Option<i64>,
}

impl From<EstimateCreate> for EstimateCreateDBRequest {
    fn from(create: EstimateCreate) -> Self {
        Self {
            customer_id: create.customer_id,
            title: create.title,
            total_cents: create.total_cents,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimateUpdate {
    pub title: Option<String>,
    pub status: Option<EstimateStatus>,
    pub total_cents: Option<i64>,
}

impl From<EstimateUpdate> for EstimateUpdateDBRequest {
    fn from(update: EstimateUpdate) -> Self {
        Self {
            title: update.title,
            status: update.status,
            total_cents: update.total_cents,
        }
    }
}

/// Signature submitted against a shared estimate.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSignRequest {
    pub signed_by: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: EstimateId,
    #[schema(value_type = String, format = "uuid")]
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

impl From<EstimateDBResponse> for EstimateResponse {
    fn from(estimate: EstimateDBResponse) -> Self {
        Self {
            id: estimate.id,
            customer_id: estimate.customer_id,
            title: estimate.title,
            status: estimate.status,
            total_cents: estimate.total_cents,
            share_token: estimate.share_token,
            signed_by: estimate.signed_by,
            signed_at: estimate.signed_at,
            created_at: estimate.created_at,
            updated_at: estimate.updated_at,
        }
    }
}

/// Public view of a shared estimate. Carries no identifiers beyond the
/// estimate itself: no customer id, no company id, no share token echo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicEstimateResponse {
    pub title: String,
    pub status: EstimateStatus,
    pub total_cents: Option<i64>,
    pub signed_by: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
}

impl From<EstimateDBResponse> for PublicEstimateResponse {
    fn from(estimate: EstimateDBResponse) -> Self {
        Self {
            title: estimate.title,
            status: estimate.status,
            total_cents: estimate.total_cents,
            signed_by: estimate.signed_by,
            signed_at: estimate.signed_at,
        }
    }
}
