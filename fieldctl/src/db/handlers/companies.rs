use crate::db::errors::Result;
use crate::db::models::companies::{CompanyCreateDBRequest, CompanyDBResponse, CompanyMemberDBResponse, MemberRole};
use crate::types::{abbrev_uuid, CompanyId, UserId};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Companies<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Companies<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    pub async fn create(&mut self, request: &CompanyCreateDBRequest) -> Result<CompanyDBResponse> {
        let company = sqlx::query_as::<_, CompanyDBResponse>(
            "INSERT INTO companies (name) VALUES ($1) RETURNING *",
        )
        .bind(&request.name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(company)
    }

    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: CompanyId) -> Result<Option<CompanyDBResponse>> {
        let company = sqlx::query_as::<_, CompanyDBResponse>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company)
    }

    /// Companies the user belongs to with a staff-level role. Portal roles
    /// never surface here, so a portal account cannot switch into a company.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn list_for_user(&mut self, user_id: UserId) -> Result<Vec<CompanyDBResponse>> {
        let companies = sqlx::query_as::<_, CompanyDBResponse>(
            r#"
            SELECT c.* FROM companies c
            INNER JOIN company_members cm ON cm.company_id = c.id
            WHERE cm.user_id = $1 AND cm.role IN ('owner', 'staff')
            ORDER BY c.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(companies)
    }

    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&company_id), user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn get_member(&mut self, company_id: CompanyId, user_id: UserId) -> Result<Option<CompanyMemberDBResponse>> {
        let member = sqlx::query_as::<_, CompanyMemberDBResponse>(
            "SELECT * FROM company_members WHERE company_id = $1 AND user_id = $2",
        )
        .bind(company_id)
        .bind(user_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(member)
    }

    /// Upsert the membership row. Re-inviting an already-linked identity
    /// keeps exactly one row and refreshes the role.
    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&company_id), user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn add_member(&mut self, company_id: CompanyId, user_id: UserId, role: MemberRole) -> Result<CompanyMemberDBResponse> {
        let member = sqlx::query_as::<_, CompanyMemberDBResponse>(
            r#"
            INSERT INTO company_members (company_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (company_id, user_id) DO UPDATE SET role = EXCLUDED.role
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(member)
    }

    /// Memberships the user holds across all companies, any role. Revocation
    /// uses this to decide whether the identity is orphaned.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn count_memberships(&mut self, user_id: UserId) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM company_members WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&company_id), user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn remove_member(&mut self, company_id: CompanyId, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM company_members WHERE company_id = $1 AND user_id = $2")
            .bind(company_id)
            .bind(user_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
