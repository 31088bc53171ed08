//! Consultation handlers.
//!
//! Creation mints a share token and provisions a video room best-effort.
//! A provisioning failure never fails the request.

use crate::{
    api::models::{
        common::{Data, ListQuery},
        consultations::{ConsultationCreate, ConsultationResponse},
    },
    auth::{guard::ensure_company_owns, principal::StaffSession},
    cache::private_cache,
    crypto::generate_share_token,
    db::{
        errors::DbError,
        handlers::Consultations,
        models::consultations::ConsultationCreateDBRequest,
    },
    errors::{Error, Result},
    services::video::VideoService,
    types::ConsultationId,
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
    path = "/consultations",
    tag = "consultations",
    summary = "List consultations",
    params(ListQuery),
    responses(
        (status = 200, description = "Consultations in the active company", body = Data<Vec<ConsultationResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_consultations(
    State(state): State<AppState>,
    session: StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let (_, limit) = query.resolve(20, 20);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let consultations = Consultations::new(&mut conn).list(session.company_id, limit).await?;

    let response: Vec<ConsultationResponse> = consultations.into_iter().map(ConsultationResponse::from).collect();
    Ok((private_cache(30, 60), Json(Data::new(response))))
}

#[utoipa::path(
    post,
    path = "/consultations",
    tag = "consultations",
    summary = "Create consultation",
    request_body = ConsultationCreate,
    responses(
        (status = 201, description = "Consultation created with a join link", body = Data<ConsultationResponse>),
        (status = 400, description = "Invalid consultation data"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn create_consultation(
    State(state): State<AppState>,
    session: StaffSession,
    Json(data): Json<ConsultationCreate>,
) -> Result<impl IntoResponse> {
    if data.customer_name.trim().is_empty() {
        return Err(Error::bad_request("Customer name cannot be empty"));
    }

    let share_token = generate_share_token();

    let room = VideoService::new(state.config.video.clone())
        .provision_room(&format!("consult-{share_token}"))
        .await;

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let consultation = Consultations::new(&mut conn)
        .create(
            session.company_id,
            &ConsultationCreateDBRequest {
                customer_name: data.customer_name.trim().to_string(),
                customer_email: data.customer_email,
                scheduled_at: data.scheduled_at,
                share_token,
                video_room_name: room.as_ref().map(|r| r.name.clone()),
                video_room_url: room.map(|r| r.url),
            },
        )
        .await?;

    info!(consultation_id = %consultation.id, "consultation created");
    Ok((StatusCode::CREATED, Json(Data::new(ConsultationResponse::from(consultation)))))
}

#[utoipa::path(
    get,
    path = "/consultations/{id}",
    tag = "consultations",
    summary = "Get consultation",
    params(("id" = uuid::Uuid, Path, description = "Consultation ID")),
    responses(
        (status = 200, description = "Consultation detail", body = Data<ConsultationResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Consultation belongs to another company"),
        (status = 404, description = "Consultation not found"),
    )
)]
pub async fn get_consultation(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<ConsultationId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Consultations::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let consultation = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
        resource: "Consultation".to_string(),
        id: id.to_string(),
    })?;

    Ok((private_cache(30, 60), Json(Data::new(ConsultationResponse::from(consultation)))))
}

#[utoipa::path(
    delete,
    path = "/consultations/{id}",
    tag = "consultations",
    summary = "Delete consultation",
    params(("id" = uuid::Uuid, Path, description = "Consultation ID")),
    responses(
        (status = 204, description = "Consultation deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Consultation belongs to another company"),
        (status = 404, description = "Consultation not found"),
    )
)]
pub async fn delete_consultation(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<ConsultationId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Consultations::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    repo.delete(session.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
