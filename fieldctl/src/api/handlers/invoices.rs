//! Invoice handlers.

use crate::{
    api::models::{
        common::{Data, ListQuery},
        invoices::{InvoiceCreate, InvoiceResponse, InvoiceUpdate},
    },
    auth::{guard::ensure_company_owns, principal::StaffSession},
    cache::private_cache,
    db::{
        errors::DbError,
        handlers::{invoices::InvoiceFilter, Customers, Invoices, Jobs, Repository},
    },
    db::models::invoices::InvoiceStatus,
    errors::{Error, Result},
    types::{CustomerId, InvoiceId},
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
pub struct ListInvoicesQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    #[param(value_type = Option<String>, format = "uuid")]
    pub customer_id: Option<CustomerId>,
    pub status: Option<InvoiceStatus>,
}

#[utoipa::path(
    get,
    path = "/invoices",
    tag = "invoices",
    summary = "List invoices",
    params(ListInvoicesQuery),
    responses(
        (status = 200, description = "Invoices in the active company", body = Data<Vec<InvoiceResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    session: StaffSession,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<impl IntoResponse> {
    let pagination = ListQuery {
        skip: query.skip,
        limit: query.limit,
    };
    let (skip, limit) = pagination.resolve(100, 100);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let invoices = Invoices::new(&mut conn)
        .list(
            session.company_id,
            &InvoiceFilter {
                skip,
                limit,
                customer_id: query.customer_id,
                status: query.status,
            },
        )
        .await?;

    let response: Vec<InvoiceResponse> = invoices.into_iter().map(InvoiceResponse::from).collect();
    Ok((private_cache(15, 30), Json(Data::new(response))))
}

#[utoipa::path(
    post,
    path = "/invoices",
    tag = "invoices",
    summary = "Create invoice",
    request_body = InvoiceCreate,
    responses(
        (status = 201, description = "Invoice created as a draft", body = Data<InvoiceResponse>),
        (status = 400, description = "Invalid invoice data"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Referenced customer or job belongs to another company"),
        (status = 404, description = "Referenced customer or job not found"),
    )
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    session: StaffSession,
    Json(data): Json<InvoiceCreate>,
) -> Result<impl IntoResponse> {
    if data.amount_due_cents < 0 {
        return Err(Error::bad_request("Invoice amount cannot be negative"));
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    ensure_company_owns(&mut Customers::new(&mut conn), session.company_id, data.customer_id).await?;
    if let Some(job_id) = data.job_id {
        ensure_company_owns(&mut Jobs::new(&mut conn), session.company_id, job_id).await?;
    }

    let invoice = Invoices::new(&mut conn).create(session.company_id, &data.into()).await?;
    Ok((StatusCode::CREATED, Json(Data::new(InvoiceResponse::from(invoice)))))
}

#[utoipa::path(
    get,
    path = "/invoices/{id}",
    tag = "invoices",
    summary = "Get invoice",
    params(("id" = uuid::Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice detail", body = Data<InvoiceResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invoice belongs to another company"),
        (status = 404, description = "Invoice not found"),
    )
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<InvoiceId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Invoices::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let invoice = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
        resource: "Invoice".to_string(),
        id: id.to_string(),
    })?;

    Ok((private_cache(15, 30), Json(Data::new(InvoiceResponse::from(invoice)))))
}

#[utoipa::path(
    put,
    path = "/invoices/{id}",
    tag = "invoices",
    summary = "Update invoice",
    params(("id" = uuid::Uuid, Path, description = "Invoice ID")),
    request_body = InvoiceUpdate,
    responses(
        (status = 200, description = "Invoice updated", body = Data<InvoiceResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invoice belongs to another company"),
        (status = 404, description = "Invoice not found"),
    )
)]
pub async fn update_invoice(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<InvoiceId>,
    Json(data): Json<InvoiceUpdate>,
) -> Result<impl IntoResponse> {
    if matches!(data.amount_due_cents, Some(cents) if cents < 0)
        || matches!(data.amount_paid_cents, Some(cents) if cents < 0)
    {
        return Err(Error::bad_request("Invoice amount cannot be negative"));
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Invoices::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let invoice = repo.update(session.company_id, id, &data.into()).await?;
    Ok(Json(Data::new(InvoiceResponse::from(invoice))))
}

#[utoipa::path(
    delete,
    path = "/invoices/{id}",
    tag = "invoices",
    summary = "Delete invoice",
    params(("id" = uuid::Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Invoice belongs to another company"),
        (status = 404, description = "Invoice not found"),
    )
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<InvoiceId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Invoices::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    repo.delete(session.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
