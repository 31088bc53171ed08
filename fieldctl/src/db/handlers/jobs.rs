use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::{OwnedEntity, Repository};
use crate::db::models::jobs::{JobCreateDBRequest, JobDBResponse, JobStatus, JobUpdateDBRequest};
use crate::types::{abbrev_uuid, CompanyId, CrewId, CustomerId, JobId};
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing jobs
#[derive(Debug, Clone)]
pub struct JobFilter {
    pub skip: i64,
    pub limit: i64,
    pub customer_id: Option<CustomerId>,
    pub crew_id: Option<CrewId>,
    pub status: Option<JobStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 200,
            customer_id: None,
            crew_id: None,
            status: None,
            from: None,
            to: None,
        }
    }
}

pub struct Jobs<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Jobs<'c> {
    type CreateRequest = JobCreateDBRequest;
    type UpdateRequest = JobUpdateDBRequest;
    type Response = JobDBResponse;
    type Id = JobId;
    type Filter = JobFilter;

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&company_id), title = %request.title), err)]
    async fn create(&mut self, company_id: CompanyId, request: &Self::CreateRequest) -> Result<Self::Response> {
        let job = sqlx::query_as::<_, JobDBResponse>(
            r#"
            INSERT INTO jobs (company_id, customer_id, crew_id, title, description, status, scheduled_start, scheduled_end, total_cents)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'scheduled'), $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(request.customer_id)
        .bind(request.crew_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.status)
        .bind(request.scheduled_start)
        .bind(request.scheduled_end)
        .bind(request.total_cents)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(job)
    }

    #[instrument(skip(self), fields(job_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, company_id: CompanyId, id: Self::Id) -> Result<Option<Self::Response>> {
        let job = sqlx::query_as::<_, JobDBResponse>("SELECT * FROM jobs WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(job)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, company_id: CompanyId, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let jobs = sqlx::query_as::<_, JobDBResponse>(
            r#"
            SELECT * FROM jobs
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR customer_id = $2)
              AND ($3::uuid IS NULL OR crew_id = $3)
              AND ($4::varchar IS NULL OR status = $4)
              AND ($5::timestamptz IS NULL OR scheduled_start >= $5)
              AND ($6::timestamptz IS NULL OR scheduled_start <= $6)
            ORDER BY scheduled_start ASC NULLS LAST, created_at DESC
            LIMIT $7 OFFSET $8
            "#,
        )
        .bind(company_id)
        .bind(filter.customer_id)
        .bind(filter.crew_id)
        .bind(filter.status)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(jobs)
    }

    #[instrument(skip(self, request), fields(job_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, company_id: CompanyId, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Nullable columns use a set-flag plus value pair so the caller can
        // clear them, not just overwrite.
        let job = sqlx::query_as::<_, JobDBResponse>(
            r#"
            UPDATE jobs
            SET
                crew_id = CASE WHEN $3 THEN $4 ELSE crew_id END,
                title = COALESCE($5, title),
                description = COALESCE($6, description),
                status = COALESCE($7, status),
                scheduled_start = CASE WHEN $8 THEN $9 ELSE scheduled_start END,
                scheduled_end = CASE WHEN $10 THEN $11 ELSE scheduled_end END,
                total_cents = COALESCE($12, total_cents),
                updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(request.crew_id.is_some())
        .bind(request.crew_id.flatten())
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.status)
        .bind(request.scheduled_start.is_some())
        .bind(request.scheduled_start.flatten())
        .bind(request.scheduled_end.is_some())
        .bind(request.scheduled_end.flatten())
        .bind(request.total_cents)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(job)
    }

    #[instrument(skip(self), fields(job_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, company_id: CompanyId, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> OwnedEntity for Jobs<'c> {
    const RESOURCE: &'static str = "Job";

    async fn company_of(&mut self, id: Uuid) -> Result<Option<CompanyId>> {
        let company_id = sqlx::query_scalar::<_, CompanyId>("SELECT company_id FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company_id)
    }
}

impl<'c> Jobs<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Jobs for one customer, newest scheduled first. Used by the customer
    /// portal, where the customer id comes from the session profile.
    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&customer_id)), err)]
    pub async fn list_for_customer(&mut self, company_id: CompanyId, customer_id: CustomerId, limit: i64) -> Result<Vec<JobDBResponse>> {
        let jobs = sqlx::query_as::<_, JobDBResponse>(
            r#"
            SELECT * FROM jobs
            WHERE company_id = $1 AND customer_id = $2
            ORDER BY scheduled_start DESC NULLS LAST
            LIMIT $3
            "#,
        )
        .bind(company_id)
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(jobs)
    }

    /// Scheduled jobs for the customer that have not started yet. Dashboard
    /// counter.
    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&customer_id)), err)]
    pub async fn count_upcoming_for_customer(&mut self, company_id: CompanyId, customer_id: CustomerId) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM jobs
            WHERE company_id = $1 AND customer_id = $2
              AND status = 'scheduled'
              AND (scheduled_start IS NULL OR scheduled_start >= NOW())
            "#,
        )
        .bind(company_id)
        .bind(customer_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }

    /// Upcoming jobs assigned to any crew the technician belongs to.
    #[instrument(skip(self), fields(technician_id = %abbrev_uuid(&technician_id)), err)]
    pub async fn list_for_technician(&mut self, company_id: CompanyId, technician_id: crate::types::TechnicianId, limit: i64) -> Result<Vec<JobDBResponse>> {
        let jobs = sqlx::query_as::<_, JobDBResponse>(
            r#"
            SELECT j.* FROM jobs j
            INNER JOIN crew_members cm ON j.crew_id = cm.crew_id
            WHERE j.company_id = $1 AND cm.technician_id = $2
            ORDER BY j.scheduled_start ASC NULLS LAST
            LIMIT $3
            "#,
        )
        .bind(company_id)
        .bind(technician_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(jobs)
    }
}
