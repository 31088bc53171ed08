//! The shared ownership check for entity routes.

use uuid::Uuid;

use crate::{
    db::handlers::repository::OwnedEntity,
    errors::{Error, Result},
    types::{abbrev_uuid, CompanyId},
};

/// Verify that `company_id` owns the entity `id` before acting on it.
///
/// Resolves the entity's owning company without a tenant predicate so the
/// two failure shapes stay distinct:
///
/// - the entity does not exist at all -> 404 with the resource name
/// - the entity exists under another company -> 403 "Not authorized"
///
/// Every entity route performs this check before its read or write.
pub async fn ensure_company_owns<R>(repo: &mut R, company_id: CompanyId, id: Uuid) -> Result<()>
where
    R: OwnedEntity + Send,
{
    match repo.company_of(id).await? {
        None => Err(Error::NotFound {
            resource: R::RESOURCE.to_string(),
            id: abbrev_uuid(&id),
        }),
        Some(owner) if owner == company_id => Ok(()),
        Some(_) => Err(Error::NotAuthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::Result as DbResult;
    use axum::http::StatusCode;

    /// A fake owned entity backed by a fixed answer.
    struct FakeEntity {
        owner: Option<CompanyId>,
    }

    #[async_trait::async_trait]
    impl OwnedEntity for FakeEntity {
        const RESOURCE: &'static str = "Widget";

        async fn company_of(&mut self, _id: Uuid) -> DbResult<Option<CompanyId>> {
            Ok(self.owner)
        }
    }

    #[tokio::test]
    async fn test_owned_entity_passes() {
        let company_id = Uuid::new_v4();
        let mut repo = FakeEntity { owner: Some(company_id) };

        let result = ensure_company_owns(&mut repo, company_id, Uuid::new_v4()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_found() {
        let mut repo = FakeEntity { owner: None };

        let err = ensure_company_owns(&mut repo, Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.user_message().contains("Widget"));
    }

    #[tokio::test]
    async fn test_foreign_entity_is_forbidden() {
        let mut repo = FakeEntity {
            owner: Some(Uuid::new_v4()),
        };

        let err = ensure_company_owns(&mut repo, Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.user_message(), "Not authorized");
    }
}
