//! Base repository traits for tenant-scoped database operations.

use crate::db::errors::Result;
use crate::types::CompanyId;
use uuid::Uuid;

/// Base repository trait for company-scoped tables.
///
/// Every method takes the caller's company id and bakes it into the SQL
/// predicate. There is no unscoped variant; a row outside the company is
/// indistinguishable from a missing row at this layer.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The request type for updating entities
    type UpdateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity under the given company
    async fn create(&mut self, company_id: CompanyId, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID within the company
    async fn get_by_id(&mut self, company_id: CompanyId, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities within the company with filtering and capped pagination
    async fn list(&mut self, company_id: CompanyId, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Update an entity by ID within the company
    async fn update(&mut self, company_id: CompanyId, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response>;

    /// Delete an entity by ID within the company. Returns false if no row matched.
    async fn delete(&mut self, company_id: CompanyId, id: Self::Id) -> Result<bool>;
}

/// Ownership lookup used by the authorization guard.
///
/// Resolves an entity id to the company that owns it, without any tenant
/// predicate: the guard needs to tell "does not exist" apart from "exists
/// under another company".
#[async_trait::async_trait]
pub trait OwnedEntity {
    /// Resource name used in not-found errors, e.g. "Customer".
    const RESOURCE: &'static str;

    async fn company_of(&mut self, id: Uuid) -> Result<Option<CompanyId>>;
}
