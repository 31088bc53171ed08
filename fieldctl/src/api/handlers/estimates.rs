//! Estimate handlers: CRUD plus the send transition that mints a share token.

use crate::{
    api::models::{
        common::{Data, ListQuery},
        estimates::{EstimateCreate, EstimateResponse, EstimateUpdate},
    },
    auth::{guard::ensure_company_owns, principal::StaffSession},
    cache::private_cache,
    crypto::generate_share_token,
    db::{
        errors::DbError,
        handlers::{estimates::EstimateFilter, Customers, Estimates, Repository},
    },
    db::models::estimates::EstimateStatus,
    errors::{Error, Result},
    types::{CustomerId, EstimateId},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListEstimatesQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    #[param(value_type = Option<String>, format = "uuid")]
    pub customer_id: Option<CustomerId>,
    pub status: Option<EstimateStatus>,
}

#[utoipa::path(
    get,
    path = "/estimates",
    tag = "estimates",
    summary = "List estimates",
    params(ListEstimatesQuery),
    responses(
        (status = 200, description = "Estimates in the active company", body = Data<Vec<EstimateResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_estimates(
    State(state): State<AppState>,
    session: StaffSession,
    Query(query): Query<ListEstimatesQuery>,
) -> Result<impl IntoResponse> {
    let pagination = ListQuery {
        skip: query.skip,
        limit: query.limit,
    };
    let (skip, limit) = pagination.resolve(50, 50);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let estimates = Estimates::new(&mut conn)
        .list(
            session.company_id,
            &EstimateFilter {
                skip,
                limit,
                customer_id: query.customer_id,
                status: query.status,
            },
        )
        .await?;

    let response: Vec<EstimateResponse> = estimates.into_iter().map(EstimateResponse::from).collect();
    Ok((private_cache(15, 30), Json(Data::new(response))))
}

#[utoipa::path(
    post,
    path = "/estimates",
    tag = "estimates",
    summary = "Create estimate",
    request_body = EstimateCreate,
    responses(
        (status = 201, description = "Estimate created as a draft", body = Data<EstimateResponse>),
        (status = 400, description = "Invalid estimate data"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Referenced customer belongs to another company"),
        (status = 404, description = "Referenced customer not found"),
    )
)]
pub async fn create_estimate(
    State(state): State<AppState>,
    session: StaffSession,
    Json(data): Json<EstimateCreate>,
) -> Result<impl IntoResponse> {
    if data.title.trim().is_empty() {
        return Err(Error::bad_request("Estimate title cannot be empty"));
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    ensure_company_owns(&mut Customers::new(&mut conn), session.company_id, data.customer_id).await?;

    let estimate = Estimates::new(&mut conn).create(session.company_id, &data.into()).await?;
    Ok((StatusCode::CREATED, Json(Data::new(EstimateResponse::from(estimate)))))
}

#[utoipa::path(
    get,
    path = "/estimates/{id}",
    tag = "estimates",
    summary = "Get estimate",
    params(("id" = uuid::Uuid, Path, description = "Estimate ID")),
    responses(
        (status = 200, description = "Estimate detail", body = Data<EstimateResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Estimate belongs to another company"),
        (status = 404, description = "Estimate not found"),
    )
)]
pub async fn get_estimate(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<EstimateId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Estimates::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let estimate = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
        resource: "Estimate".to_string(),
        id: id.to_string(),
    })?;

    Ok((private_cache(15, 30), Json(Data::new(EstimateResponse::from(estimate)))))
}

#[utoipa::path(
    put,
    path = "/estimates/{id}",
    tag = "estimates",
    summary = "Update estimate",
    params(("id" = uuid::Uuid, Path, description = "Estimate ID")),
    request_body = EstimateUpdate,
    responses(
        (status = 200, description = "Estimate updated", body = Data<EstimateResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Estimate belongs to another company"),
        (status = 404, description = "Estimate not found"),
    )
)]
pub async fn update_estimate(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<EstimateId>,
    Json(data): Json<EstimateUpdate>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Estimates::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let estimate = repo.update(session.company_id, id, &data.into()).await?;
    Ok(Json(Data::new(EstimateResponse::from(estimate))))
}

/// Transition the estimate to sent and mint a fresh share token. Re-sending
/// an already sent estimate rotates the token, which revokes the old link.
#[utoipa::path(
    post,
    path = "/estimates/{id}/send",
    tag = "estimates",
    summary = "Send estimate",
    params(("id" = uuid::Uuid, Path, description = "Estimate ID")),
    responses(
        (status = 200, description = "Estimate marked sent with a share token", body = Data<EstimateResponse>),
        (status = 400, description = "Estimate is not in a sendable state"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Estimate belongs to another company"),
        (status = 404, description = "Estimate not found"),
    )
)]
pub async fn send_estimate(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<EstimateId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Estimates::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let token = generate_share_token();
    let estimate = repo
        .mark_sent(session.company_id, id, &token)
        .await?
        .ok_or_else(|| Error::bad_request("Only draft or sent estimates can be sent"))?;

    info!(estimate_id = %estimate.id, "estimate sent");
    Ok(Json(Data::new(EstimateResponse::from(estimate))))
}

#[utoipa::path(
    delete,
    path = "/estimates/{id}",
    tag = "estimates",
    summary = "Delete estimate",
    params(("id" = uuid::Uuid, Path, description = "Estimate ID")),
    responses(
        (status = 204, description = "Estimate deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Estimate belongs to another company"),
        (status = 404, description = "Estimate not found"),
    )
)]
pub async fn delete_estimate(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<EstimateId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Estimates::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    repo.delete(session.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
