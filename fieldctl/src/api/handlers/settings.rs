//! Company settings handlers: arrival windows.

use crate::{
    api::models::{
        common::Data,
        settings::{validate_windows, ArrivalWindowResponse, SaveArrivalWindowsRequest},
    },
    auth::principal::StaffSession,
    cache::private_cache,
    db::{errors::DbError, handlers::ArrivalWindows},
    errors::Result,
    AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use sqlx::Acquire;

#[utoipa::path(
    get,
    path = "/settings/arrival-windows",
    tag = "settings",
    summary = "List arrival windows",
    responses(
        (status = 200, description = "Arrival windows in display order", body = Data<Vec<ArrivalWindowResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_arrival_windows(State(state): State<AppState>, session: StaffSession) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let windows = ArrivalWindows::new(&mut conn).list(session.company_id).await?;

    let response: Vec<ArrivalWindowResponse> = windows.into_iter().map(ArrivalWindowResponse::from).collect();
    Ok((private_cache(60, 120), Json(Data::new(response))))
}

/// Replace the company's arrival windows with the submitted list.
///
/// The save is all-or-nothing: one invalid window rejects the request and the
/// previous set stays untouched.
#[utoipa::path(
    put,
    path = "/settings/arrival-windows",
    tag = "settings",
    summary = "Save arrival windows",
    request_body = SaveArrivalWindowsRequest,
    responses(
        (status = 200, description = "Windows replaced", body = Data<Vec<ArrivalWindowResponse>>),
        (status = 400, description = "A window is missing a label or has an unparseable time"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn save_arrival_windows(
    State(state): State<AppState>,
    session: StaffSession,
    Json(data): Json<SaveArrivalWindowsRequest>,
) -> Result<impl IntoResponse> {
    let validated = validate_windows(&data.windows)?;

    let mut tx = state.db.begin().await.map_err(DbError::from)?;
    let saved = {
        let mut windows = ArrivalWindows::new(tx.acquire().await.map_err(DbError::from)?);
        windows.replace_all(session.company_id, &validated).await?
    };
    tx.commit().await.map_err(DbError::from)?;

    let response: Vec<ArrivalWindowResponse> = saved.into_iter().map(ArrivalWindowResponse::from).collect();
    Ok(Json(Data::new(response)))
}
