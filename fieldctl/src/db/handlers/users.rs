use crate::db::errors::{DbError, Result};
use crate::db::models::users::{UserAuthDBResponse, UserCreateDBRequest, UserDBResponse};
use crate::types::{abbrev_uuid, CompanyId, UserId};
use sqlx::PgConnection;
use tracing::instrument;

/// Auth identities are global, not company-scoped: one row per email, shared
/// by staff logins and portal accounts alike.
pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    pub async fn create(&mut self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            INSERT INTO users (email, password_hash, display_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, display_name, active_company_id, is_active, created_at, updated_at
            "#,
        )
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(&request.display_name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: UserId) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            "SELECT id, email, display_name, active_company_id, is_active, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self, email), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            "SELECT id, email, display_name, active_company_id, is_active, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user)
    }

    /// Credential row for login verification. The hash never leaves this path.
    #[instrument(skip(self, email), err)]
    pub async fn get_auth_by_email(&mut self, email: &str) -> Result<Option<UserAuthDBResponse>> {
        let user = sqlx::query_as::<_, UserAuthDBResponse>(
            "SELECT id, email, password_hash, is_active FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user)
    }

    /// Point the user at a different active company. The membership check
    /// happens at the API layer before this runs.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    pub async fn set_active_company(&mut self, id: UserId, company_id: Option<CompanyId>) -> Result<UserDBResponse> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            UPDATE users SET active_company_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, display_name, active_company_id, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(user)
    }

    #[instrument(skip(self, password_hash), fields(user_id = %abbrev_uuid(&id)), err)]
    pub async fn set_password_hash(&mut self, id: UserId, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&mut self, id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
