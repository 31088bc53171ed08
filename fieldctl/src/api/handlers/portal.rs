//! Portal access management and portal-facing reads.
//!
//! Invites and revocations run as single transactions. An invite either
//! fully links an identity, a membership, and the profile row, or changes
//! nothing; the invitation email goes out only after the commit and is
//! best-effort. Revocation unwinds the same three pieces and deletes the
//! identity when no membership remains anywhere.

use crate::{
    api::models::{
        common::{Data, ListQuery},
        estimates::EstimateResponse,
        invoices::InvoiceResponse,
        jobs::JobResponse,
        portal::{CustomerDashboardResponse, PortalInviteRequest, PortalInviteResponse},
    },
    auth::{
        guard::ensure_company_owns,
        password::hash_password,
        principal::{CustomerSession, StaffSession, TechnicianSession},
    },
    cache::private_cache,
    crypto::generate_temp_password,
    db::{
        errors::DbError,
        handlers::{Companies, Customers, Estimates, Invoices, Jobs, Repository, Technicians, Users},
        models::{companies::MemberRole, users::UserCreateDBRequest, users::UserDBResponse},
    },
    email::EmailService,
    errors::{Error, Result},
    types::{CustomerId, TechnicianId, UserId},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use sqlx::Acquire;
use tracing::{info, warn};

/// Reuse the identity registered under this email, or mint a new one with a
/// temporary password. Returns the identity and the cleartext temp password
/// when one was generated.
async fn resolve_invite_identity(
    users: &mut Users<'_>,
    email: &str,
    display_name: Option<String>,
) -> Result<(UserDBResponse, Option<String>)> {
    if let Some(existing) = users.get_by_email(email).await? {
        return Ok((existing, None));
    }

    let temp_password = generate_temp_password();
    let password_hash = hash_password(&temp_password)?;
    let user = users
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            password_hash: Some(password_hash),
            display_name,
        })
        .await?;

    Ok((user, Some(temp_password)))
}

/// Send the invitation email after the invite has committed. Failures are
/// logged, never surfaced: access is already granted.
async fn send_invite_email(
    state: &AppState,
    to_email: &str,
    to_name: Option<&str>,
    company_name: &str,
    temp_password: Option<&str>,
) {
    let Some(temp_password) = temp_password else {
        return;
    };

    let service = match EmailService::new(&state.config) {
        Ok(service) => service,
        Err(e) => {
            warn!("could not initialize email service: {e}");
            return;
        }
    };

    if let Err(e) = service.send_portal_invite(to_email, to_name, company_name, temp_password).await {
        warn!("portal invite email failed: {e}");
    }
}

/// Remove the membership and delete the identity when nothing references it
/// anymore. Runs inside the revoke transaction.
async fn unlink_identity(conn: &mut sqlx::PgConnection, company_id: crate::types::CompanyId, user_id: UserId) -> Result<()> {
    let mut companies = Companies::new(&mut *conn);
    companies.remove_member(company_id, user_id).await?;

    if companies.count_memberships(user_id).await? == 0 {
        Users::new(&mut *conn).delete(user_id).await?;
    }

    Ok(())
}

#[utoipa::path(
    post,
    path = "/customers/{id}/portal-invite",
    tag = "portal",
    summary = "Invite customer to portal",
    params(("id" = uuid::Uuid, Path, description = "Customer ID")),
    request_body = PortalInviteRequest,
    responses(
        (status = 200, description = "Portal access granted", body = Data<PortalInviteResponse>),
        (status = 400, description = "No email available for the invite"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Customer belongs to another company"),
        (status = 404, description = "Customer not found"),
    )
)]
pub async fn invite_customer(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<CustomerId>,
    Json(data): Json<PortalInviteRequest>,
) -> Result<impl IntoResponse> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let (customer, company_name) = {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        let mut repo = Customers::new(conn);
        ensure_company_owns(&mut repo, session.company_id, id).await?;
        let customer = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
            resource: "Customer".to_string(),
            id: id.to_string(),
        })?;

        let conn = tx.acquire().await.map_err(DbError::from)?;
        let company = Companies::new(conn).get_by_id(session.company_id).await?;
        (customer, company.map(|c| c.name).unwrap_or_default())
    };

    let email = data
        .email
        .or(customer.email.clone())
        .map(|e| e.trim().to_lowercase())
        .filter(|e| e.contains('@'))
        .ok_or_else(|| Error::bad_request("An email address is required to grant portal access"))?;

    let (user, temp_password) = {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        resolve_invite_identity(&mut Users::new(conn), &email, Some(customer.name.clone())).await?
    };

    {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        Companies::new(conn).add_member(session.company_id, user.id, MemberRole::Customer).await?;
    }
    {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        Customers::new(conn).set_portal_user(session.company_id, id, Some(user.id)).await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    send_invite_email(&state, &email, Some(&customer.name), &company_name, temp_password.as_deref()).await;

    info!(customer_id = %id, "customer portal access granted");
    Ok(Json(Data::new(PortalInviteResponse { email, temp_password })))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}/portal-access",
    tag = "portal",
    summary = "Revoke customer portal access",
    params(("id" = uuid::Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Portal access revoked"),
        (status = 400, description = "Customer has no portal access"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Customer belongs to another company"),
        (status = 404, description = "Customer not found"),
    )
)]
pub async fn revoke_customer_access(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<CustomerId>,
) -> Result<impl IntoResponse> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let portal_user_id = {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        let mut repo = Customers::new(conn);
        ensure_company_owns(&mut repo, session.company_id, id).await?;
        let customer = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
            resource: "Customer".to_string(),
            id: id.to_string(),
        })?;
        customer.portal_user_id.ok_or_else(|| Error::bad_request("No portal access"))?
    };

    {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        Customers::new(conn).set_portal_user(session.company_id, id, None).await?;
    }
    {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        unlink_identity(conn, session.company_id, portal_user_id).await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    info!(customer_id = %id, "customer portal access revoked");
    Ok(Json(Data::new(serde_json::json!({ "revoked": true }))))
}

#[utoipa::path(
    post,
    path = "/technicians/{id}/portal-invite",
    tag = "portal",
    summary = "Invite technician to portal",
    params(("id" = uuid::Uuid, Path, description = "Technician ID")),
    request_body = PortalInviteRequest,
    responses(
        (status = 200, description = "Portal access granted", body = Data<PortalInviteResponse>),
        (status = 400, description = "No email available for the invite"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Technician belongs to another company"),
        (status = 404, description = "Technician not found"),
    )
)]
pub async fn invite_technician(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<TechnicianId>,
    Json(data): Json<PortalInviteRequest>,
) -> Result<impl IntoResponse> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let (technician, company_name) = {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        let mut repo = Technicians::new(conn);
        ensure_company_owns(&mut repo, session.company_id, id).await?;
        let technician = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
            resource: "Technician".to_string(),
            id: id.to_string(),
        })?;

        let conn = tx.acquire().await.map_err(DbError::from)?;
        let company = Companies::new(conn).get_by_id(session.company_id).await?;
        (technician, company.map(|c| c.name).unwrap_or_default())
    };

    let email = data
        .email
        .or(technician.email.clone())
        .map(|e| e.trim().to_lowercase())
        .filter(|e| e.contains('@'))
        .ok_or_else(|| Error::bad_request("An email address is required to grant portal access"))?;

    let (user, temp_password) = {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        resolve_invite_identity(&mut Users::new(conn), &email, Some(technician.name.clone())).await?
    };

    {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        Companies::new(conn).add_member(session.company_id, user.id, MemberRole::Technician).await?;
    }
    {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        Technicians::new(conn).set_portal_user(session.company_id, id, Some(user.id)).await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    send_invite_email(&state, &email, Some(&technician.name), &company_name, temp_password.as_deref()).await;

    info!(technician_id = %id, "technician portal access granted");
    Ok(Json(Data::new(PortalInviteResponse { email, temp_password })))
}

#[utoipa::path(
    delete,
    path = "/technicians/{id}/portal-access",
    tag = "portal",
    summary = "Revoke technician portal access",
    params(("id" = uuid::Uuid, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Portal access revoked"),
        (status = 400, description = "Technician has no portal access"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Technician belongs to another company"),
        (status = 404, description = "Technician not found"),
    )
)]
pub async fn revoke_technician_access(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<TechnicianId>,
) -> Result<impl IntoResponse> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    let portal_user_id = {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        let mut repo = Technicians::new(conn);
        ensure_company_owns(&mut repo, session.company_id, id).await?;
        let technician = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
            resource: "Technician".to_string(),
            id: id.to_string(),
        })?;
        technician.portal_user_id.ok_or_else(|| Error::bad_request("No portal access"))?
    };

    {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        Technicians::new(conn).set_portal_user(session.company_id, id, None).await?;
    }
    {
        let conn = tx.acquire().await.map_err(DbError::from)?;
        unlink_identity(conn, session.company_id, portal_user_id).await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    info!(technician_id = %id, "technician portal access revoked");
    Ok(Json(Data::new(serde_json::json!({ "revoked": true }))))
}

/// Aggregate figures for the customer dashboard. A customer with no history
/// gets all zeroes, not an error.
#[utoipa::path(
    get,
    path = "/portal/dashboard",
    tag = "portal",
    summary = "Customer dashboard",
    responses(
        (status = 200, description = "Dashboard aggregates", body = Data<CustomerDashboardResponse>),
        (status = 401, description = "No customer portal session"),
    )
)]
pub async fn customer_dashboard(State(state): State<AppState>, session: CustomerSession) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    let upcoming_jobs = Jobs::new(&mut conn)
        .count_upcoming_for_customer(session.company_id, session.customer.id)
        .await?;
    let pending_estimates = Estimates::new(&mut conn)
        .count_pending_for_customer(session.company_id, session.customer.id)
        .await?;
    let summary = Invoices::new(&mut conn)
        .summary_for_customer(session.company_id, session.customer.id)
        .await?;

    let dashboard = CustomerDashboardResponse::new(upcoming_jobs, pending_estimates, summary);
    Ok((private_cache(30, 60), Json(Data::new(dashboard))))
}

#[utoipa::path(
    get,
    path = "/portal/jobs",
    tag = "portal",
    summary = "Customer jobs",
    params(ListQuery),
    responses(
        (status = 200, description = "The customer's jobs", body = Data<Vec<JobResponse>>),
        (status = 401, description = "No customer portal session"),
    )
)]
pub async fn portal_jobs(
    State(state): State<AppState>,
    session: CustomerSession,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let (_, limit) = query.resolve(50, 200);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let jobs = Jobs::new(&mut conn)
        .list_for_customer(session.company_id, session.customer.id, limit)
        .await?;

    let response: Vec<JobResponse> = jobs.into_iter().map(JobResponse::from).collect();
    Ok((private_cache(30, 60), Json(Data::new(response))))
}

/// Estimates visible to the signed-in customer. Drafts stay internal.
#[utoipa::path(
    get,
    path = "/portal/estimates",
    tag = "portal",
    summary = "Customer estimates",
    params(ListQuery),
    responses(
        (status = 200, description = "The customer's non-draft estimates", body = Data<Vec<EstimateResponse>>),
        (status = 401, description = "No customer portal session"),
    )
)]
pub async fn portal_estimates(
    State(state): State<AppState>,
    session: CustomerSession,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let (_, limit) = query.resolve(50, 50);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let estimates = Estimates::new(&mut conn)
        .list_for_customer(session.company_id, session.customer.id, limit)
        .await?;

    let response: Vec<EstimateResponse> = estimates.into_iter().map(EstimateResponse::from).collect();
    Ok((private_cache(30, 60), Json(Data::new(response))))
}

/// Invoices visible to the signed-in customer. Drafts stay internal.
#[utoipa::path(
    get,
    path = "/portal/invoices",
    tag = "portal",
    summary = "Customer invoices",
    params(ListQuery),
    responses(
        (status = 200, description = "The customer's non-draft invoices", body = Data<Vec<InvoiceResponse>>),
        (status = 401, description = "No customer portal session"),
    )
)]
pub async fn portal_invoices(
    State(state): State<AppState>,
    session: CustomerSession,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let (_, limit) = query.resolve(50, 100);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let invoices = Invoices::new(&mut conn)
        .list_for_customer(session.company_id, session.customer.id, limit)
        .await?;

    let response: Vec<InvoiceResponse> = invoices.into_iter().map(InvoiceResponse::from).collect();
    Ok((private_cache(30, 60), Json(Data::new(response))))
}

/// Jobs assigned to any crew the signed-in technician belongs to.
#[utoipa::path(
    get,
    path = "/portal/schedule",
    tag = "portal",
    summary = "Technician schedule",
    params(ListQuery),
    responses(
        (status = 200, description = "Jobs assigned to the technician's crews", body = Data<Vec<JobResponse>>),
        (status = 401, description = "No technician portal session"),
    )
)]
pub async fn technician_schedule(
    State(state): State<AppState>,
    session: TechnicianSession,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let (_, limit) = query.resolve(50, 200);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let jobs = Jobs::new(&mut conn)
        .list_for_technician(session.company_id, session.technician.id, limit)
        .await?;

    let response: Vec<JobResponse> = jobs.into_iter().map(JobResponse::from).collect();
    Ok((private_cache(30, 60), Json(Data::new(response))))
}
