use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::{OwnedEntity, Repository};
use crate::db::models::invoices::{
    CustomerInvoiceSummary, InvoiceCreateDBRequest, InvoiceDBResponse, InvoiceStatus, InvoiceUpdateDBRequest,
};
use crate::types::{abbrev_uuid, CompanyId, CustomerId, InvoiceId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing invoices
#[derive(Debug, Clone)]
pub struct InvoiceFilter {
    pub skip: i64,
    pub limit: i64,
    pub customer_id: Option<CustomerId>,
    pub status: Option<InvoiceStatus>,
}

impl Default for InvoiceFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100, customer_id: None, status: None }
    }
}

pub struct Invoices<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Invoices<'c> {
    type CreateRequest = InvoiceCreateDBRequest;
    type UpdateRequest = InvoiceUpdateDBRequest;
    type Response = InvoiceDBResponse;
    type Id = InvoiceId;
    type Filter = InvoiceFilter;

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&company_id)), err)]
    async fn create(&mut self, company_id: CompanyId, request: &Self::CreateRequest) -> Result<Self::Response> {
        let invoice = sqlx::query_as::<_, InvoiceDBResponse>(
            r#"
            INSERT INTO invoices (company_id, customer_id, job_id, amount_due_cents, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(request.customer_id)
        .bind(request.job_id)
        .bind(request.amount_due_cents)
        .bind(request.due_date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(invoice)
    }

    #[instrument(skip(self), fields(invoice_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, company_id: CompanyId, id: Self::Id) -> Result<Option<Self::Response>> {
        let invoice = sqlx::query_as::<_, InvoiceDBResponse>(
            "SELECT * FROM invoices WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(invoice)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, company_id: CompanyId, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let invoices = sqlx::query_as::<_, InvoiceDBResponse>(
            r#"
            SELECT * FROM invoices
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR customer_id = $2)
              AND ($3::varchar IS NULL OR status = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(company_id)
        .bind(filter.customer_id)
        .bind(filter.status)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(invoices)
    }

    #[instrument(skip(self, request), fields(invoice_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, company_id: CompanyId, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let invoice = sqlx::query_as::<_, InvoiceDBResponse>(
            r#"
            UPDATE invoices
            SET
                status = COALESCE($3, status),
                amount_due_cents = COALESCE($4, amount_due_cents),
                amount_paid_cents = COALESCE($5, amount_paid_cents),
                due_date = CASE WHEN $6 THEN $7 ELSE due_date END,
                updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(request.status)
        .bind(request.amount_due_cents)
        .bind(request.amount_paid_cents)
        .bind(request.due_date.is_some())
        .bind(request.due_date.flatten())
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(invoice)
    }

    #[instrument(skip(self), fields(invoice_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, company_id: CompanyId, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> OwnedEntity for Invoices<'c> {
    const RESOURCE: &'static str = "Invoice";

    async fn company_of(&mut self, id: Uuid) -> Result<Option<CompanyId>> {
        let company_id = sqlx::query_scalar::<_, CompanyId>("SELECT company_id FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company_id)
    }
}

impl<'c> Invoices<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Invoices visible to one portal customer. Drafts stay hidden.
    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&customer_id)), err)]
    pub async fn list_for_customer(&mut self, company_id: CompanyId, customer_id: CustomerId, limit: i64) -> Result<Vec<InvoiceDBResponse>> {
        let invoices = sqlx::query_as::<_, InvoiceDBResponse>(
            r#"
            SELECT * FROM invoices
            WHERE company_id = $1 AND customer_id = $2 AND status != 'draft'
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(company_id)
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(invoices)
    }

    /// Billing aggregates for the portal dashboard. COALESCE keeps the
    /// figures at zero when the customer has no invoices at all.
    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&customer_id)), err)]
    pub async fn summary_for_customer(&mut self, company_id: CompanyId, customer_id: CustomerId) -> Result<CustomerInvoiceSummary> {
        let summary = sqlx::query_as::<_, CustomerInvoiceSummary>(
            r#"
            SELECT
                COALESCE(SUM(amount_due_cents - amount_paid_cents) FILTER (WHERE status = 'sent'), 0)::bigint AS outstanding_cents,
                COALESCE(SUM(amount_paid_cents) FILTER (WHERE status = 'paid'), 0)::bigint AS paid_cents,
                COALESCE(COUNT(*) FILTER (WHERE status = 'sent'), 0)::bigint AS open_invoices
            FROM invoices
            WHERE company_id = $1 AND customer_id = $2
            "#,
        )
        .bind(company_id)
        .bind(customer_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(summary)
    }
}
