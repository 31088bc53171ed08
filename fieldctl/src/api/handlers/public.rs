//! Public token-addressed pages: shared estimates and consultation joins.
//!
//! No session, no tenant predicate. The token is the capability, and an
//! unknown token gets a plain 404 with no hint about what exists.

use crate::{
    api::models::{
        common::Data,
        consultations::PublicConsultationResponse,
        estimates::{EstimateSignRequest, PublicEstimateResponse},
    },
    cache::public_cache,
    db::{
        errors::DbError,
        handlers::{Consultations, Estimates},
        models::estimates::EstimateStatus,
    },
    errors::{Error, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use tracing::info;

fn share_not_found() -> Error {
    Error::NotFound {
        resource: "Page".to_string(),
        id: String::new(),
    }
}

#[utoipa::path(
    get,
    path = "/p/estimates/{token}",
    tag = "public",
    summary = "View shared estimate",
    params(("token" = String, Path, description = "Share token")),
    responses(
        (status = 200, description = "Public estimate view", body = Data<PublicEstimateResponse>),
        (status = 404, description = "Unknown token"),
    )
)]
pub async fn public_estimate(State(state): State<AppState>, Path(token): Path<String>) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let estimate = Estimates::new(&mut conn)
        .get_by_share_token(&token)
        .await?
        .ok_or_else(share_not_found)?;

    Ok((public_cache(), Json(Data::new(PublicEstimateResponse::from(estimate)))))
}

/// Sign a shared estimate. Only a sent estimate can be signed; an already
/// signed or withdrawn one rejects with a clear message rather than a 404.
#[utoipa::path(
    post,
    path = "/p/estimates/{token}/sign",
    tag = "public",
    summary = "Sign shared estimate",
    params(("token" = String, Path, description = "Share token")),
    request_body = EstimateSignRequest,
    responses(
        (status = 200, description = "Estimate signed", body = Data<PublicEstimateResponse>),
        (status = 400, description = "Estimate is not open for signing"),
        (status = 404, description = "Unknown token"),
    )
)]
pub async fn sign_public_estimate(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(data): Json<EstimateSignRequest>,
) -> Result<impl IntoResponse> {
    let signed_by = data.signed_by.trim();
    if signed_by.is_empty() {
        return Err(Error::bad_request("A name is required to sign"));
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Estimates::new(&mut conn);

    if let Some(estimate) = repo.sign_by_token(&token, signed_by).await? {
        info!(estimate_id = %estimate.id, "estimate signed");
        return Ok(Json(Data::new(PublicEstimateResponse::from(estimate))));
    }

    // Distinguish a dead token from an estimate that is simply not signable.
    match repo.get_by_share_token(&token).await? {
        Some(estimate) if estimate.status == EstimateStatus::Approved => {
            Err(Error::bad_request("This estimate has already been signed"))
        }
        Some(_) => Err(Error::bad_request("This estimate is not open for signing")),
        None => Err(share_not_found()),
    }
}

#[utoipa::path(
    get,
    path = "/p/consultations/{token}",
    tag = "public",
    summary = "View consultation join page",
    params(("token" = String, Path, description = "Share token")),
    responses(
        (status = 200, description = "Public consultation view", body = Data<PublicConsultationResponse>),
        (status = 404, description = "Unknown token"),
    )
)]
pub async fn public_consultation(State(state): State<AppState>, Path(token): Path<String>) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let consultation = Consultations::new(&mut conn)
        .get_by_share_token(&token)
        .await?
        .ok_or_else(share_not_found)?;

    Ok((public_cache(), Json(Data::new(PublicConsultationResponse::from(consultation)))))
}
