//! Crew handlers, including membership replacement and detach-on-delete.

use crate::{
    api::models::{
        common::{Data, ListQuery},
        crews::{CrewCreate, CrewMembersUpdate, CrewResponse, CrewUpdate},
    },
    auth::{guard::ensure_company_owns, principal::StaffSession},
    cache::private_cache,
    db::{
        errors::DbError,
        handlers::{crews::CrewFilter, Crews, Repository},
    },
    errors::{Error, Result},
    types::CrewId,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use sqlx::Acquire;

#[utoipa::path(
    get,
    path = "/crews",
    tag = "crews",
    summary = "List crews",
    params(ListQuery),
    responses(
        (status = 200, description = "Crews in the active company", body = Data<Vec<CrewResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_crews(
    State(state): State<AppState>,
    session: StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let (skip, limit) = query.resolve(50, 50);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let crews = Crews::new(&mut conn)
        .list(session.company_id, &CrewFilter { skip, limit })
        .await?;

    let response: Vec<CrewResponse> = crews.into_iter().map(CrewResponse::from).collect();
    Ok((private_cache(30, 60), Json(Data::new(response))))
}

#[utoipa::path(
    post,
    path = "/crews",
    tag = "crews",
    summary = "Create crew",
    request_body = CrewCreate,
    responses(
        (status = 201, description = "Crew created", body = Data<CrewResponse>),
        (status = 400, description = "Invalid crew data"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn create_crew(
    State(state): State<AppState>,
    session: StaffSession,
    Json(data): Json<CrewCreate>,
) -> Result<impl IntoResponse> {
    if data.name.trim().is_empty() {
        return Err(Error::bad_request("Crew name cannot be empty"));
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let crew = Crews::new(&mut conn).create(session.company_id, &data.into()).await?;

    Ok((StatusCode::CREATED, Json(Data::new(CrewResponse::from(crew)))))
}

#[utoipa::path(
    get,
    path = "/crews/{id}",
    tag = "crews",
    summary = "Get crew",
    params(("id" = uuid::Uuid, Path, description = "Crew ID")),
    responses(
        (status = 200, description = "Crew detail with member IDs", body = Data<CrewResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Crew belongs to another company"),
        (status = 404, description = "Crew not found"),
    )
)]
pub async fn get_crew(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<CrewId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Crews::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let crew = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
        resource: "Crew".to_string(),
        id: id.to_string(),
    })?;

    Ok((private_cache(30, 60), Json(Data::new(CrewResponse::from(crew)))))
}

#[utoipa::path(
    put,
    path = "/crews/{id}",
    tag = "crews",
    summary = "Update crew",
    params(("id" = uuid::Uuid, Path, description = "Crew ID")),
    request_body = CrewUpdate,
    responses(
        (status = 200, description = "Crew updated", body = Data<CrewResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Crew belongs to another company"),
        (status = 404, description = "Crew not found"),
    )
)]
pub async fn update_crew(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<CrewId>,
    Json(data): Json<CrewUpdate>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Crews::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let crew = repo.update(session.company_id, id, &data.into()).await?;
    Ok(Json(Data::new(CrewResponse::from(crew))))
}

/// Replace the crew's membership with the given technician set.
#[utoipa::path(
    put,
    path = "/crews/{id}/members",
    tag = "crews",
    summary = "Set crew members",
    params(("id" = uuid::Uuid, Path, description = "Crew ID")),
    request_body = CrewMembersUpdate,
    responses(
        (status = 200, description = "Membership replaced", body = Data<CrewResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Crew belongs to another company"),
        (status = 404, description = "Crew not found"),
    )
)]
pub async fn set_crew_members(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<CrewId>,
    Json(data): Json<CrewMembersUpdate>,
) -> Result<impl IntoResponse> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let crew = {
        let mut repo = Crews::new(tx.acquire().await.map_err(DbError::from)?);
        ensure_company_owns(&mut repo, session.company_id, id).await?;

        repo.set_members(session.company_id, id, &data.technician_ids).await?;
        repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
            resource: "Crew".to_string(),
            id: id.to_string(),
        })?
    };

    tx.commit().await.map_err(DbError::from)?;

    Ok(Json(Data::new(CrewResponse::from(crew))))
}

/// Delete a crew. Its jobs survive with the crew assignment cleared; the
/// detach and the delete commit together.
#[utoipa::path(
    delete,
    path = "/crews/{id}",
    tag = "crews",
    summary = "Delete crew",
    params(("id" = uuid::Uuid, Path, description = "Crew ID")),
    responses(
        (status = 204, description = "Crew deleted, jobs detached"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Crew belongs to another company"),
        (status = 404, description = "Crew not found"),
    )
)]
pub async fn delete_crew(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<CrewId>,
) -> Result<impl IntoResponse> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    {
        let mut repo = Crews::new(tx.acquire().await.map_err(DbError::from)?);
        ensure_company_owns(&mut repo, session.company_id, id).await?;
        repo.delete(session.company_id, id).await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
