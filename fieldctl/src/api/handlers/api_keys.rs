//! API key handlers. The secret is returned once, on creation.

use crate::{
    api::models::{
        api_keys::{ApiKeyCreate, ApiKeyInfoResponse, ApiKeyResponse},
        common::{Data, ListQuery},
    },
    auth::{guard::ensure_company_owns, principal::StaffSession},
    crypto::generate_api_key,
    db::{
        errors::DbError,
        handlers::ApiKeys,
        models::api_keys::ApiKeyCreateDBRequest,
    },
    errors::{Error, Result},
    types::ApiKeyId,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/settings/api-keys",
    tag = "settings",
    summary = "List API keys",
    params(ListQuery),
    responses(
        (status = 200, description = "API keys with redacted secrets", body = Data<Vec<ApiKeyInfoResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_api_keys(
    State(state): State<AppState>,
    session: StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let (_, limit) = query.resolve(20, 20);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let api_keys = ApiKeys::new(&mut conn).list(session.company_id, limit).await?;

    let response: Vec<ApiKeyInfoResponse> = api_keys.into_iter().map(ApiKeyInfoResponse::from).collect();
    Ok(Json(Data::new(response)))
}

#[utoipa::path(
    post,
    path = "/settings/api-keys",
    tag = "settings",
    summary = "Create API key",
    request_body = ApiKeyCreate,
    responses(
        (status = 201, description = "API key created; the secret appears only here", body = Data<ApiKeyResponse>),
        (status = 400, description = "Invalid key name"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn create_api_key(
    State(state): State<AppState>,
    session: StaffSession,
    Json(data): Json<ApiKeyCreate>,
) -> Result<impl IntoResponse> {
    if data.name.trim().is_empty() {
        return Err(Error::bad_request("API key name cannot be empty"));
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let api_key = ApiKeys::new(&mut conn)
        .create(
            session.company_id,
            &ApiKeyCreateDBRequest {
                name: data.name.trim().to_string(),
                secret: generate_api_key(),
                created_by: session.user.id,
            },
        )
        .await?;

    info!(api_key_id = %api_key.id, "API key created");
    Ok((StatusCode::CREATED, Json(Data::new(ApiKeyResponse::from(api_key)))))
}

#[utoipa::path(
    delete,
    path = "/settings/api-keys/{id}",
    tag = "settings",
    summary = "Delete API key",
    params(("id" = uuid::Uuid, Path, description = "API key ID")),
    responses(
        (status = 204, description = "API key deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "API key belongs to another company"),
        (status = 404, description = "API key not found"),
    )
)]
pub async fn delete_api_key(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<ApiKeyId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = ApiKeys::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    repo.delete(session.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
