//! Database models for invoices and portal billing aggregates.

use crate::types::{CompanyId, CustomerId, InvoiceId, JobId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Void,
}

#[derive(Debug, Clone)]
pub struct InvoiceCreateDBRequest {
    pub customer_id: CustomerId,
    pub job_id: Option<JobId>,
    pub amount_due_cents: i64,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdateDBRequest {
    pub status: Option<InvoiceStatus>,
    pub amount_due_cents: Option<i64>,
    pub amount_paid_cents: Option<i64>,
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceDBResponse {
    pub id: InvoiceId,
    pub company_id: CompanyId,
    pub customer_id: CustomerId,
    pub job_id: Option<JobId>,
    pub status: InvoiceStatus,
    pub amount_due_cents: i64,
    pub amount_paid_cents: i64,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate billing figures for one customer, used by the portal dashboard.
/// All fields default to zero when the customer has no invoices.
#[derive(Debug, Clone, Default, FromRow)]
pub struct CustomerInvoiceSummary {
    pub outstanding_cents: i64,
    pub paid_cents: i64,
    pub open_invoices: i64,
}
