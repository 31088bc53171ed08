//! Customer wire models.

use crate::db::models::customers::{CustomerCreateDBRequest, CustomerDBResponse, CustomerUpdateDBRequest};
use crate::types::CustomerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<CustomerCreate> for CustomerCreateDBRequest {
    fn from(create: CustomerCreate) -> Self {
        Self {
            name: create.name,
            email: create.email,
            phone: create.phone,
            address: create.address,
            notes: create.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<CustomerUpdate> for CustomerUpdateDBRequest {
    fn from(update: CustomerUpdate) -> Self {
        Self {
            name: update.name,
            email: update.email,
            phone: update.phone,
            address: update.address,
            notes: update.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub has_portal_access: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerDBResponse> for CustomerResponse {
    fn from(customer: CustomerDBResponse) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            latitude: customer.latitude,
            longitude: customer.longitude,
            notes: customer.notes,
            has_portal_access: customer.portal_user_id.is_some(),
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}
