use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::{OwnedEntity, Repository};
use crate::db::models::crews::{CrewCreateDBRequest, CrewDBResponse, CrewUpdateDBRequest};
use crate::types::{abbrev_uuid, CompanyId, CrewId, TechnicianId};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing crews
#[derive(Debug, Clone)]
pub struct CrewFilter {
    pub skip: i64,
    pub limit: i64,
}

impl Default for CrewFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 50 }
    }
}

// Database entity model; membership is resolved separately.
#[derive(Debug, Clone, FromRow)]
struct Crew {
    pub id: CrewId,
    pub company_id: CompanyId,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<(Vec<TechnicianId>, Crew)> for CrewDBResponse {
    fn from((member_ids, crew): (Vec<TechnicianId>, Crew)) -> Self {
        Self {
            id: crew.id,
            company_id: crew.company_id,
            name: crew.name,
            color: crew.color,
            member_ids,
            created_at: crew.created_at,
        }
    }
}

pub struct Crews<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Crews<'c> {
    type CreateRequest = CrewCreateDBRequest;
    type UpdateRequest = CrewUpdateDBRequest;
    type Response = CrewDBResponse;
    type Id = CrewId;
    type Filter = CrewFilter;

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&company_id), name = %request.name), err)]
    async fn create(&mut self, company_id: CompanyId, request: &Self::CreateRequest) -> Result<Self::Response> {
        let crew = sqlx::query_as::<_, Crew>(
            "INSERT INTO crews (company_id, name, color) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(company_id)
        .bind(&request.name)
        .bind(&request.color)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(CrewDBResponse::from((Vec::new(), crew)))
    }

    #[instrument(skip(self), fields(crew_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, company_id: CompanyId, id: Self::Id) -> Result<Option<Self::Response>> {
        let crew = sqlx::query_as::<_, Crew>("SELECT * FROM crews WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .fetch_optional(&mut *self.db)
            .await?;

        match crew {
            Some(crew) => Ok(Some(CrewDBResponse::from((self.get_crew_members(crew.id).await?, crew)))),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, company_id: CompanyId, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let crews = sqlx::query_as::<_, Crew>(
            "SELECT * FROM crews WHERE company_id = $1 ORDER BY name ASC LIMIT $2 OFFSET $3",
        )
        .bind(company_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        let mut responses = Vec::new();
        for crew in crews {
            let member_ids = self.get_crew_members(crew.id).await?;
            responses.push(CrewDBResponse::from((member_ids, crew)));
        }
        Ok(responses)
    }

    #[instrument(skip(self, request), fields(crew_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, company_id: CompanyId, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let crew = sqlx::query_as::<_, Crew>(
            r#"
            UPDATE crews
            SET name = COALESCE($3, name), color = COALESCE($4, color)
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(&request.name)
        .bind(&request.color)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(CrewDBResponse::from((self.get_crew_members(crew.id).await?, crew)))
    }

    /// Deleting a crew detaches its jobs and membership first. Jobs survive
    /// with crew_id reset to NULL; the caller wraps this in a transaction.
    #[instrument(skip(self), fields(crew_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, company_id: CompanyId, id: Self::Id) -> Result<bool> {
        sqlx::query("UPDATE jobs SET crew_id = NULL WHERE crew_id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        sqlx::query("DELETE FROM crew_members WHERE crew_id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        let result = sqlx::query("DELETE FROM crews WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> OwnedEntity for Crews<'c> {
    const RESOURCE: &'static str = "Crew";

    async fn company_of(&mut self, id: Uuid) -> Result<Option<CompanyId>> {
        let company_id = sqlx::query_scalar::<_, CompanyId>("SELECT company_id FROM crews WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company_id)
    }
}

impl<'c> Crews<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), fields(crew_id = %abbrev_uuid(&crew_id)), err)]
    async fn get_crew_members(&mut self, crew_id: CrewId) -> Result<Vec<TechnicianId>> {
        let member_ids = sqlx::query_scalar::<_, TechnicianId>(
            "SELECT technician_id FROM crew_members WHERE crew_id = $1 ORDER BY technician_id",
        )
        .bind(crew_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(member_ids)
    }

    /// Replace the crew's membership. Technicians outside the company are
    /// silently skipped by the ownership join.
    #[instrument(skip(self, technician_ids), fields(crew_id = %abbrev_uuid(&crew_id), count = technician_ids.len()), err)]
    pub async fn set_members(&mut self, company_id: CompanyId, crew_id: CrewId, technician_ids: &[TechnicianId]) -> Result<Vec<TechnicianId>> {
        sqlx::query("DELETE FROM crew_members WHERE crew_id = $1")
            .bind(crew_id)
            .execute(&mut *self.db)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO crew_members (crew_id, technician_id)
            SELECT $1, t.id FROM technicians t
            WHERE t.id = ANY($2) AND t.company_id = $3
            "#,
        )
        .bind(crew_id)
        .bind(technician_ids)
        .bind(company_id)
        .execute(&mut *self.db)
        .await?;

        self.get_crew_members(crew_id).await
    }
}
