use crate::db::errors::Result;
use crate::db::handlers::repository::OwnedEntity;
use crate::db::models::consultations::{ConsultationCreateDBRequest, ConsultationDBResponse};
use crate::types::{abbrev_uuid, CompanyId, ConsultationId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Consultations have a small surface: staff create and review them, the
/// public joins by share token. No update path.
pub struct Consultations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Consultations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&company_id), customer_name = %request.customer_name), err)]
    pub async fn create(&mut self, company_id: CompanyId, request: &ConsultationCreateDBRequest) -> Result<ConsultationDBResponse> {
        let consultation = sqlx::query_as::<_, ConsultationDBResponse>(
            r#"
            INSERT INTO consultations (company_id, customer_name, customer_email, scheduled_at, share_token, video_room_name, video_room_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&request.customer_name)
        .bind(&request.customer_email)
        .bind(request.scheduled_at)
        .bind(&request.share_token)
        .bind(&request.video_room_name)
        .bind(&request.video_room_url)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(consultation)
    }

    #[instrument(skip(self), fields(consultation_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, company_id: CompanyId, id: ConsultationId) -> Result<Option<ConsultationDBResponse>> {
        let consultation = sqlx::query_as::<_, ConsultationDBResponse>(
            "SELECT * FROM consultations WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(consultation)
    }

    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&company_id)), err)]
    pub async fn list(&mut self, company_id: CompanyId, limit: i64) -> Result<Vec<ConsultationDBResponse>> {
        let consultations = sqlx::query_as::<_, ConsultationDBResponse>(
            r#"
            SELECT * FROM consultations
            WHERE company_id = $1
            ORDER BY scheduled_at DESC NULLS LAST, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(consultations)
    }

    #[instrument(skip(self), fields(consultation_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&mut self, company_id: CompanyId, id: ConsultationId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM consultations WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Join page lookup by opaque token, no session required.
    #[instrument(skip(self, token), err)]
    pub async fn get_by_share_token(&mut self, token: &str) -> Result<Option<ConsultationDBResponse>> {
        let consultation = sqlx::query_as::<_, ConsultationDBResponse>(
            "SELECT * FROM consultations WHERE share_token = $1",
        )
        .bind(token)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(consultation)
    }
}

#[async_trait::async_trait]
impl<'c> OwnedEntity for Consultations<'c> {
    const RESOURCE: &'static str = "Consultation";

    async fn company_of(&mut self, id: Uuid) -> Result<Option<CompanyId>> {
        let company_id = sqlx::query_scalar::<_, CompanyId>("SELECT company_id FROM consultations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company_id)
    }
}
