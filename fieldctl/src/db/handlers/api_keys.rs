use crate::db::errors::Result;
use crate::db::handlers::repository::OwnedEntity;
use crate::db::models::api_keys::{ApiKeyCreateDBRequest, ApiKeyDBResponse};
use crate::types::{abbrev_uuid, ApiKeyId, CompanyId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

pub struct ApiKeys<'c> {
    db: &'c mut PgConnection,
}

impl<'c> ApiKeys<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&company_id), name = %request.name), err)]
    pub async fn create(&mut self, company_id: CompanyId, request: &ApiKeyCreateDBRequest) -> Result<ApiKeyDBResponse> {
        let api_key = sqlx::query_as::<_, ApiKeyDBResponse>(
            r#"
            INSERT INTO api_keys (company_id, name, secret, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&request.name)
        .bind(&request.secret)
        .bind(request.created_by)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(api_key)
    }

    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&company_id)), err)]
    pub async fn list(&mut self, company_id: CompanyId, limit: i64) -> Result<Vec<ApiKeyDBResponse>> {
        let api_keys = sqlx::query_as::<_, ApiKeyDBResponse>(
            "SELECT * FROM api_keys WHERE company_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(api_keys)
    }

    #[instrument(skip(self), fields(api_key_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&mut self, company_id: CompanyId, id: ApiKeyId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> OwnedEntity for ApiKeys<'c> {
    const RESOURCE: &'static str = "API key";

    async fn company_of(&mut self, id: Uuid) -> Result<Option<CompanyId>> {
        let company_id = sqlx::query_scalar::<_, CompanyId>("SELECT company_id FROM api_keys WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company_id)
    }
}
