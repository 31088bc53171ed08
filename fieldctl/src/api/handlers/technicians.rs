//! Technician handlers.

use crate::{
    api::models::{
        common::{Data, ListQuery},
        technicians::{TechnicianCreate, TechnicianResponse, TechnicianUpdate},
    },
    auth::{guard::ensure_company_owns, principal::StaffSession},
    cache::private_cache,
    db::{
        errors::DbError,
        handlers::{technicians::TechnicianFilter, Repository, Technicians},
    },
    errors::{Error, Result},
    types::TechnicianId,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListTechniciansQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Only include technicians who are currently active
    pub active_only: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/technicians",
    tag = "technicians",
    summary = "List technicians",
    params(ListTechniciansQuery),
    responses(
        (status = 200, description = "Technicians in the active company", body = Data<Vec<TechnicianResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_technicians(
    State(state): State<AppState>,
    session: StaffSession,
    Query(query): Query<ListTechniciansQuery>,
) -> Result<impl IntoResponse> {
    let pagination = ListQuery {
        skip: query.skip,
        limit: query.limit,
    };
    let (skip, limit) = pagination.resolve(100, 100);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let technicians = Technicians::new(&mut conn)
        .list(
            session.company_id,
            &TechnicianFilter {
                skip,
                limit,
                active_only: query.active_only.unwrap_or(false),
            },
        )
        .await?;

    let response: Vec<TechnicianResponse> = technicians.into_iter().map(TechnicianResponse::from).collect();
    Ok((private_cache(30, 60), Json(Data::new(response))))
}

#[utoipa::path(
    post,
    path = "/technicians",
    tag = "technicians",
    summary = "Create technician",
    request_body = TechnicianCreate,
    responses(
        (status = 201, description = "Technician created", body = Data<TechnicianResponse>),
        (status = 400, description = "Invalid technician data"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn create_technician(
    State(state): State<AppState>,
    session: StaffSession,
    Json(data): Json<TechnicianCreate>,
) -> Result<impl IntoResponse> {
    if data.name.trim().is_empty() {
        return Err(Error::bad_request("Technician name cannot be empty"));
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let technician = Technicians::new(&mut conn).create(session.company_id, &data.into()).await?;

    Ok((StatusCode::CREATED, Json(Data::new(TechnicianResponse::from(technician)))))
}

#[utoipa::path(
    get,
    path = "/technicians/{id}",
    tag = "technicians",
    summary = "Get technician",
    params(("id" = uuid::Uuid, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Technician detail", body = Data<TechnicianResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Technician belongs to another company"),
        (status = 404, description = "Technician not found"),
    )
)]
pub async fn get_technician(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<TechnicianId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Technicians::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let technician = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
        resource: "Technician".to_string(),
        id: id.to_string(),
    })?;

    Ok((private_cache(30, 60), Json(Data::new(TechnicianResponse::from(technician)))))
}

#[utoipa::path(
    put,
    path = "/technicians/{id}",
    tag = "technicians",
    summary = "Update technician",
    params(("id" = uuid::Uuid, Path, description = "Technician ID")),
    request_body = TechnicianUpdate,
    responses(
        (status = 200, description = "Technician updated", body = Data<TechnicianResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Technician belongs to another company"),
        (status = 404, description = "Technician not found"),
    )
)]
pub async fn update_technician(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<TechnicianId>,
    Json(data): Json<TechnicianUpdate>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Technicians::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let technician = repo.update(session.company_id, id, &data.into()).await?;
    Ok(Json(Data::new(TechnicianResponse::from(technician))))
}

#[utoipa::path(
    delete,
    path = "/technicians/{id}",
    tag = "technicians",
    summary = "Delete technician",
    params(("id" = uuid::Uuid, Path, description = "Technician ID")),
    responses(
        (status = 204, description = "Technician deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Technician belongs to another company"),
        (status = 404, description = "Technician not found"),
    )
)]
pub async fn delete_technician(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<TechnicianId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Technicians::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    repo.delete(session.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
