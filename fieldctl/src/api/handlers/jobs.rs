//! Job handlers.
//!
//! Creating or reassigning a job verifies the referenced customer and crew
//! through the same ownership guard as entity routes, so a job can never
//! point across tenants.

use crate::{
    api::models::{
        common::{Data, ListQuery},
        jobs::{JobCreate, JobResponse, JobUpdate, ListJobsQuery},
    },
    auth::{guard::ensure_company_owns, principal::StaffSession},
    cache::private_cache,
    db::{
        errors::DbError,
        handlers::{jobs::JobFilter, Crews, Customers, Jobs, Repository},
    },
    errors::{Error, Result},
    types::JobId,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    summary = "List jobs",
    params(ListJobsQuery),
    responses(
        (status = 200, description = "Jobs in the active company", body = Data<Vec<JobResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    session: StaffSession,
    Query(query): Query<ListJobsQuery>,
) -> Result<impl IntoResponse> {
    let pagination = ListQuery {
        skip: query.skip,
        limit: query.limit,
    };
    let (skip, limit) = pagination.resolve(200, 200);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let jobs = Jobs::new(&mut conn)
        .list(
            session.company_id,
            &JobFilter {
                skip,
                limit,
                customer_id: query.customer_id,
                crew_id: query.crew_id,
                status: query.status,
                from: query.from,
                to: query.to,
            },
        )
        .await?;

    let response: Vec<JobResponse> = jobs.into_iter().map(JobResponse::from).collect();
    Ok((private_cache(15, 30), Json(Data::new(response))))
}

#[utoipa::path(
    post,
    path = "/jobs",
    tag = "jobs",
    summary = "Create job",
    request_body = JobCreate,
    responses(
        (status = 201, description = "Job created", body = Data<JobResponse>),
        (status = 400, description = "Invalid job data"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Referenced customer or crew belongs to another company"),
        (status = 404, description = "Referenced customer or crew not found"),
    )
)]
pub async fn create_job(
    State(state): State<AppState>,
    session: StaffSession,
    Json(data): Json<JobCreate>,
) -> Result<impl IntoResponse> {
    if data.title.trim().is_empty() {
        return Err(Error::bad_request("Job title cannot be empty"));
    }
    if let (Some(start), Some(end)) = (data.scheduled_start, data.scheduled_end) {
        if end < start {
            return Err(Error::bad_request("Scheduled end cannot be before scheduled start"));
        }
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    ensure_company_owns(&mut Customers::new(&mut conn), session.company_id, data.customer_id).await?;
    if let Some(crew_id) = data.crew_id {
        ensure_company_owns(&mut Crews::new(&mut conn), session.company_id, crew_id).await?;
    }

    let job = Jobs::new(&mut conn).create(session.company_id, &data.into()).await?;
    Ok((StatusCode::CREATED, Json(Data::new(JobResponse::from(job)))))
}

#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "jobs",
    summary = "Get job",
    params(("id" = uuid::Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job detail", body = Data<JobResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found"),
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<JobId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Jobs::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let job = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
        resource: "Job".to_string(),
        id: id.to_string(),
    })?;

    Ok((private_cache(15, 30), Json(Data::new(JobResponse::from(job)))))
}

#[utoipa::path(
    put,
    path = "/jobs/{id}",
    tag = "jobs",
    summary = "Update job",
    params(("id" = uuid::Uuid, Path, description = "Job ID")),
    request_body = JobUpdate,
    responses(
        (status = 200, description = "Job updated", body = Data<JobResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Job or referenced crew belongs to another company"),
        (status = 404, description = "Job not found"),
    )
)]
pub async fn update_job(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<JobId>,
    Json(data): Json<JobUpdate>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    ensure_company_owns(&mut Jobs::new(&mut conn), session.company_id, id).await?;
    if let Some(Some(crew_id)) = data.crew_id {
        ensure_company_owns(&mut Crews::new(&mut conn), session.company_id, crew_id).await?;
    }

    let job = Jobs::new(&mut conn).update(session.company_id, id, &data.into()).await?;
    Ok(Json(Data::new(JobResponse::from(job))))
}

#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    tag = "jobs",
    summary = "Delete job",
    params(("id" = uuid::Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found"),
    )
)]
pub async fn delete_job(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<JobId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Jobs::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    repo.delete(session.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
