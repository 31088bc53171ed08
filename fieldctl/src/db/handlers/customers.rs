use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::{OwnedEntity, Repository};
use crate::db::models::customers::{CustomerCreateDBRequest, CustomerDBResponse, CustomerUpdateDBRequest};
use crate::types::{abbrev_uuid, CompanyId, CustomerId, UserId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing customers
#[derive(Debug, Clone)]
pub struct CustomerFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>,
}

impl Default for CustomerFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100, search: None }
    }
}

pub struct Customers<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Customers<'c> {
    type CreateRequest = CustomerCreateDBRequest;
    type UpdateRequest = CustomerUpdateDBRequest;
    type Response = CustomerDBResponse;
    type Id = CustomerId;
    type Filter = CustomerFilter;

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&company_id), name = %request.name), err)]
    async fn create(&mut self, company_id: CompanyId, request: &Self::CreateRequest) -> Result<Self::Response> {
        let customer = sqlx::query_as::<_, CustomerDBResponse>(
            r#"
            INSERT INTO customers (company_id, name, email, phone, address, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.address)
        .bind(&request.notes)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(customer)
    }

    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, company_id: CompanyId, id: Self::Id) -> Result<Option<Self::Response>> {
        let customer = sqlx::query_as::<_, CustomerDBResponse>(
            "SELECT * FROM customers WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(customer)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, company_id: CompanyId, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let customers = if let Some(search) = &filter.search {
            sqlx::query_as::<_, CustomerDBResponse>(
                r#"
                SELECT * FROM customers
                WHERE company_id = $1 AND (name ILIKE $2 OR email ILIKE $2)
                ORDER BY name ASC LIMIT $3 OFFSET $4
                "#,
            )
            .bind(company_id)
            .bind(format!("%{search}%"))
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?
        } else {
            sqlx::query_as::<_, CustomerDBResponse>(
                "SELECT * FROM customers WHERE company_id = $1 ORDER BY name ASC LIMIT $2 OFFSET $3",
            )
            .bind(company_id)
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?
        };

        Ok(customers)
    }

    #[instrument(skip(self, request), fields(customer_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, company_id: CompanyId, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let customer = sqlx::query_as::<_, CustomerDBResponse>(
            r#"
            UPDATE customers
            SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                notes = COALESCE($7, notes),
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
        .bind(&request.address)
        .bind(&request.notes)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(customer)
    }

    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, company_id: CompanyId, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> OwnedEntity for Customers<'c> {
    const RESOURCE: &'static str = "Customer";

    async fn company_of(&mut self, id: Uuid) -> Result<Option<CompanyId>> {
        let company_id = sqlx::query_scalar::<_, CompanyId>("SELECT company_id FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company_id)
    }
}

impl<'c> Customers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Stamp geocoded coordinates onto a customer. Runs outside the request
    /// transaction, so a missing row is not an error.
    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&id)), err)]
    pub async fn set_coordinates(&mut self, id: CustomerId, latitude: f64, longitude: f64) -> Result<bool> {
        let result = sqlx::query("UPDATE customers SET latitude = $2, longitude = $3, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(latitude)
            .bind(longitude)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolve the customer profile linked to a portal identity.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn get_by_portal_user(&mut self, user_id: UserId) -> Result<Option<CustomerDBResponse>> {
        let customer = sqlx::query_as::<_, CustomerDBResponse>("SELECT * FROM customers WHERE portal_user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(customer)
    }

    /// Link (or unlink) the portal identity for a customer.
    #[instrument(skip(self), fields(customer_id = %abbrev_uuid(&id)), err)]
    pub async fn set_portal_user(&mut self, company_id: CompanyId, id: CustomerId, user_id: Option<UserId>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE customers SET portal_user_id = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .bind(user_id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
