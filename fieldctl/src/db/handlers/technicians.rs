use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::{OwnedEntity, Repository};
use crate::db::models::technicians::{TechnicianCreateDBRequest, TechnicianDBResponse, TechnicianUpdateDBRequest};
use crate::types::{abbrev_uuid, CompanyId, TechnicianId, UserId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing technicians
#[derive(Debug, Clone)]
pub struct TechnicianFilter {
    pub skip: i64,
    pub limit: i64,
    pub active_only: bool,
}

impl Default for TechnicianFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100, active_only: false }
    }
}

pub struct Technicians<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Technicians<'c> {
    type CreateRequest = TechnicianCreateDBRequest;
    type UpdateRequest = TechnicianUpdateDBRequest;
    type Response = TechnicianDBResponse;
    type Id = TechnicianId;
    type Filter = TechnicianFilter;

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&company_id), name = %request.name), err)]
    async fn create(&mut self, company_id: CompanyId, request: &Self::CreateRequest) -> Result<Self::Response> {
        let technician = sqlx::query_as::<_, TechnicianDBResponse>(
            r#"
            INSERT INTO technicians (company_id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(technician)
    }

    #[instrument(skip(self), fields(technician_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, company_id: CompanyId, id: Self::Id) -> Result<Option<Self::Response>> {
        let technician = sqlx::query_as::<_, TechnicianDBResponse>(
            "SELECT * FROM technicians WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(technician)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, company_id: CompanyId, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let technicians = if filter.active_only {
            sqlx::query_as::<_, TechnicianDBResponse>(
                "SELECT * FROM technicians WHERE company_id = $1 AND is_active ORDER BY name ASC LIMIT $2 OFFSET $3",
            )
            .bind(company_id)
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?
        } else {
            sqlx::query_as::<_, TechnicianDBResponse>(
                "SELECT * FROM technicians WHERE company_id = $1 ORDER BY name ASC LIMIT $2 OFFSET $3",
            )
            .bind(company_id)
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?
        };

        Ok(technicians)
    }

    #[instrument(skip(self, request), fields(technician_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, company_id: CompanyId, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let technician = sqlx::query_as::<_, TechnicianDBResponse>(
            r#"
            UPDATE technicians
            SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.is_active)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(technician)
    }

    #[instrument(skip(self), fields(technician_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, company_id: CompanyId, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM technicians WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> OwnedEntity for Technicians<'c> {
    const RESOURCE: &'static str = "Technician";

    async fn company_of(&mut self, id: Uuid) -> Result<Option<CompanyId>> {
        let company_id = sqlx::query_scalar::<_, CompanyId>("SELECT company_id FROM technicians WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company_id)
    }
}

impl<'c> Technicians<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Resolve the technician profile linked to a portal identity.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn get_by_portal_user(&mut self, user_id: UserId) -> Result<Option<TechnicianDBResponse>> {
        let technician = sqlx::query_as::<_, TechnicianDBResponse>("SELECT * FROM technicians WHERE portal_user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(technician)
    }

    /// Link (or unlink) the portal identity for a technician.
    #[instrument(skip(self), fields(technician_id = %abbrev_uuid(&id)), err)]
    pub async fn set_portal_user(&mut self, company_id: CompanyId, id: TechnicianId, user_id: Option<UserId>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE technicians SET portal_user_id = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .bind(user_id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
