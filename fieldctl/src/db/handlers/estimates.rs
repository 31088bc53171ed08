use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::{OwnedEntity, Repository};
use crate::db::models::estimates::{EstimateCreateDBRequest, EstimateDBResponse, EstimateStatus, EstimateUpdateDBRequest};
use crate::types::{abbrev_uuid, CompanyId, CustomerId, EstimateId};
use chrono::Utc;
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing estimates
#[derive(Debug, Clone)]
pub struct EstimateFilter {
    pub skip: i64,
    pub limit: i64,
    pub customer_id: Option<CustomerId>,
    pub status: Option<EstimateStatus>,
}

impl Default for EstimateFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 50, customer_id: None, status: None }
    }
}

pub struct Estimates<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Estimates<'c> {
    type CreateRequest = EstimateCreateDBRequest;
    type UpdateRequest = EstimateUpdateDBRequest;
    type Response = EstimateDBResponse;
    type Id = EstimateId;
    type Filter = EstimateFilter;

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&company_id), title = %request.title), err)]
    async fn create(&mut self, company_id: CompanyId, request: &Self::CreateRequest) -> Result<Self::Response> {
        let estimate = sqlx::query_as::<_, EstimateDBResponse>(
            r#"
            INSERT INTO estimates (company_id, customer_id, title, total_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(request.customer_id)
        .bind(&request.title)
        .bind(request.total_cents)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(estimate)
    }

    #[instrument(skip(self), fields(estimate_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, company_id: CompanyId, id: Self::Id) -> Result<Option<Self::Response>> {
        let estimate = sqlx::query_as::<_, EstimateDBResponse>(
            "SELECT * FROM estimates WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(estimate)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, company_id: CompanyId, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let estimates = sqlx::query_as::<_, EstimateDBResponse>(
            r#"
            SELECT * FROM estimates
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

        Ok(estimates)
    }

    #[instrument(skip(self, request), fields(estimate_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, company_id: CompanyId, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let estimate = sqlx::query_as::<_, EstimateDBResponse>(
            r#"
            UPDATE estimates
            SET
                title = COALESCE($3, title),
                status = COALESCE($4, status),
                total_cents = COALESCE($5, total_cents),
                updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(&request.title)
        .bind(request.status)
        .bind(request.total_cents)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(estimate)
    }

    #[instrument(skip(self), fields(estimate_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, company_id: CompanyId, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM estimates WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> OwnedEntity for Estimates<'c> {
    const RESOURCE: &'static str = "Estimate";

    async fn company_of(&mut self, id: Uuid) -> Result<Option<CompanyId>> {
        let company_id = sqlx::query_scalar::<_, CompanyId>("SELECT company_id FROM estimates WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company_id)
    }
}

impl<'c> Estimates<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Mark the estimate sent, stamping a fresh share token. Only drafts and
    /// previously sent estimates can be re-sent.
    #[instrument(skip(self, share_token), fields(estimate_id = %abbrev_uuid(&id)), err)]
    pub async fn mark_sent(&mut self, company_id: CompanyId, id: EstimateId, share_token: &str) -> Result<Option<EstimateDBResponse>> {
        let estimate = sqlx::query_as::<_, EstimateDBResponse>(
            r#"
            UPDATE estimates
            SET status = 'sent', share_token = $3, updated_at = NOW()
            WHERE id = $1 AND company_id = $2 AND status IN ('draft', 'sent')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(share_token)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(estimate)
    }

    /// Fetch an estimate by its public share token. No tenant predicate: the
    /// token itself is the capability.
    #[instrument(skip(self, token), err)]
    pub async fn get_by_share_token(&mut self, token: &str) -> Result<Option<EstimateDBResponse>> {
        let estimate = sqlx::query_as::<_, EstimateDBResponse>("SELECT * FROM estimates WHERE share_token = $1")
            .bind(token)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(estimate)
    }

    /// Record a signature against a sent estimate. Returns None when the
    /// estimate is not in a signable state.
    #[instrument(skip(self, token, signed_by), err)]
    pub async fn sign_by_token(&mut self, token: &str, signed_by: &str) -> Result<Option<EstimateDBResponse>> {
        let estimate = sqlx::query_as::<_, EstimateDBResponse>(
            r#"
            UPDATE estimates
            SET status = 'approved', signed_by = $2, signed_at = $3, updated_at = NOW()
            WHERE share_token = $1 AND status = 'sent'
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(signed_by)
        .bind(Utc::now())
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(estimate)
    }

    /// Sent estimates awaiting the customer's decision. Dashboard counter.
    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&customer_id)), err)]
    pub async fn count_pending_for_customer(&mut self, company_id: CompanyId, customer_id: CustomerId) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM estimates WHERE company_id = $1 AND customer_id = $2 AND status = 'sent'",
        )
        .bind(company_id)
        .bind(customer_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }

    /// Estimates visible to one portal customer.
    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&customer_id)), err)]
    pub async fn list_for_customer(&mut self, company_id: CompanyId, customer_id: CustomerId, limit: i64) -> Result<Vec<EstimateDBResponse>> {
        let estimates = sqlx::query_as::<_, EstimateDBResponse>(
            r#"
            SELECT * FROM estimates
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

        Ok(estimates)
    }
}
