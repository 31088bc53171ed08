//! Invoice wire models.

use crate::db::models::invoices::{InvoiceCreateDBRequest, InvoiceDBResponse, InvoiceStatus, InvoiceUpdateDBRequest};
use crate::types::{CustomerId, InvoiceId, JobId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCreate {
    #[schema(value_type = String, format = "uuid")]
    pub customer_id: CustomerId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub job_id: Option<JobId>,
    pub amount_due_cents: i64,
    pub due_date: Option<NaiveDate>,
}

impl From<InvoiceCreate> for InvoiceCreateDBRequest {
    fn from(create: InvoiceCreate) -> Self {
        Self {
            customer_id: create.customer_id,
            job_id: create.job_id,
            amount_due_cents: create.amount_due_cents,
            due_date: create.due_date,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceUpdate {
    pub status: Option<InvoiceStatus>,
    pub amount_due_cents: Option<i64>,
    pub amount_paid_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub due_date: Option<Option<NaiveDate>>,
}

impl From<InvoiceUpdate> for InvoiceUpdateDBRequest {
    fn from(update: InvoiceUpdate) -> Self {
        Self {
            status: update.status,
            amount_due_cents: update.amount_due_cents,
            amount_paid_cents: update.amount_paid_cents,
            due_date: update.due_date,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: InvoiceId,
    #[schema(value_type = String, format = "uuid")]
    pub customer_id: CustomerId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub job_id: Option<JobId>,
    pub status: InvoiceStatus,
    pub amount_due_cents: i64,
    pub amount_paid_cents: i64,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvoiceDBResponse> for InvoiceResponse {
    fn from(invoice: InvoiceDBResponse) -> Self {
        Self {
            id: invoice.id,
            customer_id: invoice.customer_id,
            job_id: invoice.job_id,
            status: invoice.status,
            amount_due_cents: invoice.amount_due_cents,
            amount_paid_cents: invoice.amount_paid_cents,
            due_date: invoice.due_date,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}
