//! Customer handlers.
//!
//! Every route resolves the staff session first, runs the ownership guard on
//! entity routes, and only then touches the row. Address writes schedule a
//! background geocode.

use crate::{
    api::models::{
        common::{Data, ListQuery},
        customers::{CustomerCreate, CustomerResponse, CustomerUpdate},
    },
    auth::{guard::ensure_company_owns, principal::StaffSession},
    cache::private_cache,
    db::{
        errors::DbError,
        handlers::{customers::CustomerFilter, Customers, Repository},
    },
    errors::{Error, Result},
    services::geocode::spawn_geocode,
    types::CustomerId,
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
pub struct ListCustomersQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Case-insensitive match against name or email
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    summary = "List customers",
    params(ListCustomersQuery),
    responses(
        (status = 200, description = "Customers in the active company", body = Data<Vec<CustomerResponse>>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    session: StaffSession,
    Query(query): Query<ListCustomersQuery>,
) -> Result<impl IntoResponse> {
    let pagination = ListQuery {
        skip: query.skip,
        limit: query.limit,
    };
    let (skip, limit) = pagination.resolve(100, 100);

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let customers = Customers::new(&mut conn)
        .list(
            session.company_id,
            &CustomerFilter {
                skip,
                limit,
                search: query.search.filter(|s| !s.trim().is_empty()),
            },
        )
        .await?;

    let response: Vec<CustomerResponse> = customers.into_iter().map(CustomerResponse::from).collect();
    Ok((private_cache(30, 60), Json(Data::new(response))))
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    summary = "Create customer",
    request_body = CustomerCreate,
    responses(
        (status = 201, description = "Customer created", body = Data<CustomerResponse>),
        (status = 400, description = "Invalid customer data"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    session: StaffSession,
    Json(data): Json<CustomerCreate>,
) -> Result<impl IntoResponse> {
    if data.name.trim().is_empty() {
        return Err(Error::bad_request("Customer name cannot be empty"));
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let customer = Customers::new(&mut conn).create(session.company_id, &data.into()).await?;

    if let Some(address) = customer.address.clone() {
        spawn_geocode(state.db.clone(), state.config.geocoding.clone(), customer.id, address);
    }

    Ok((StatusCode::CREATED, Json(Data::new(CustomerResponse::from(customer)))))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    summary = "Get customer",
    params(("id" = uuid::Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer detail", body = Data<CustomerResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Customer belongs to another company"),
        (status = 404, description = "Customer not found"),
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<CustomerId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Customers::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let customer = repo.get_by_id(session.company_id, id).await?.ok_or_else(|| Error::NotFound {
        resource: "Customer".to_string(),
        id: id.to_string(),
    })?;

    Ok((private_cache(30, 60), Json(Data::new(CustomerResponse::from(customer)))))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    summary = "Update customer",
    params(("id" = uuid::Uuid, Path, description = "Customer ID")),
    request_body = CustomerUpdate,
    responses(
        (status = 200, description = "Customer updated", body = Data<CustomerResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Customer belongs to another company"),
        (status = 404, description = "Customer not found"),
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<CustomerId>,
    Json(data): Json<CustomerUpdate>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Customers::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    let address_changed = data.address.is_some();
    let customer = repo.update(session.company_id, id, &data.into()).await?;

    if address_changed {
        if let Some(address) = customer.address.clone() {
            spawn_geocode(state.db.clone(), state.config.geocoding.clone(), customer.id, address);
        }
    }

    Ok(Json(Data::new(CustomerResponse::from(customer))))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    summary = "Delete customer",
    params(("id" = uuid::Uuid, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Customer belongs to another company"),
        (status = 404, description = "Customer not found"),
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    session: StaffSession,
    Path(id): Path<CustomerId>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Customers::new(&mut conn);
    ensure_company_owns(&mut repo, session.company_id, id).await?;

    repo.delete(session.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
