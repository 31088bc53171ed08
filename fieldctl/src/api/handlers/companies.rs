//! Company (tenant) handlers: creation, listing, and switching.

use crate::{
    api::models::{
        auth::UserResponse,
        common::Data,
        companies::{CompanyCreate, CompanyResponse, SwitchCompanyRequest},
    },
    auth::principal::{AuthnUser, StaffSession},
    cache::private_cache,
    db::{
        errors::DbError,
        handlers::{Companies, Users},
        models::companies::{CompanyCreateDBRequest, MemberRole},
    },
    errors::{Error, Result},
    AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use sqlx::Acquire;
use tracing::info;

/// Companies the current identity can work in.
#[utoipa::path(
    get,
    path = "/companies",
    tag = "companies",
    summary = "List companies",
    responses(
        (status = 200, description = "Companies with a staff-level membership", body = Data<Vec<CompanyResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_companies(State(state): State<AppState>, AuthnUser(user): AuthnUser) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let companies = Companies::new(&mut conn).list_for_user(user.id).await?;

    let response: Vec<CompanyResponse> = companies.into_iter().map(CompanyResponse::from).collect();
    Ok((private_cache(60, 120), Json(Data::new(response))))
}

/// The company behind the current staff session.
#[utoipa::path(
    get,
    path = "/companies/current",
    tag = "companies",
    summary = "Current company",
    responses(
        (status = 200, description = "The session's active company", body = Data<CompanyResponse>),
        (status = 400, description = "No active company"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn get_current_company(State(state): State<AppState>, session: StaffSession) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let company = Companies::new(&mut conn)
        .get_by_id(session.company_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Company".to_string(),
            id: crate::types::abbrev_uuid(&session.company_id),
        })?;

    Ok((private_cache(60, 120), Json(Data::new(CompanyResponse::from(company)))))
}

/// Create a new company owned by the current identity and make it active.
#[utoipa::path(
    post,
    path = "/companies",
    tag = "companies",
    summary = "Create company",
    request_body = CompanyCreate,
    responses(
        (status = 201, description = "Company created", body = Data<CompanyResponse>),
        (status = 400, description = "Invalid company data"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn create_company(
    State(state): State<AppState>,
    AuthnUser(user): AuthnUser,
    Json(data): Json<CompanyCreate>,
) -> Result<impl IntoResponse> {
    if data.name.trim().is_empty() {
        return Err(Error::bad_request("Company name cannot be empty"));
    }

    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let company = {
        let mut companies = Companies::new(tx.acquire().await.map_err(DbError::from)?);
        let company = companies
            .create(&CompanyCreateDBRequest {
                name: data.name.trim().to_string(),
            })
            .await?;
        companies.add_member(company.id, user.id, MemberRole::Owner).await?;
        company
    };

    {
        let mut users = Users::new(tx.acquire().await.map_err(DbError::from)?);
        users.set_active_company(user.id, Some(company.id)).await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    info!(company_id = %company.id, "company created");
    Ok((StatusCode::CREATED, Json(Data::new(CompanyResponse::from(company)))))
}

/// Point the session at a different company.
///
/// Switching requires a staff-level membership in the target. A portal-role
/// membership does not qualify, and the caller learns nothing about whether
/// the target exists.
#[utoipa::path(
    post,
    path = "/companies/switch",
    tag = "companies",
    summary = "Switch active company",
    request_body = SwitchCompanyRequest,
    responses(
        (status = 200, description = "Active company updated", body = Data<UserResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "No staff membership in the target company"),
    )
)]
pub async fn switch_company(
    State(state): State<AppState>,
    AuthnUser(user): AuthnUser,
    Json(data): Json<SwitchCompanyRequest>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    let member = Companies::new(&mut conn).get_member(data.company_id, user.id).await?;
    match member {
        Some(member) if matches!(member.role, MemberRole::Owner | MemberRole::Staff) => {}
        _ => return Err(Error::NotAuthorized),
    }

    let user = Users::new(&mut conn).set_active_company(user.id, Some(data.company_id)).await?;

    Ok(Json(Data::new(UserResponse::from(user))))
}
