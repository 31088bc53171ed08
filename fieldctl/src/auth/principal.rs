//! Session principals: the three authenticated caller shapes.
//!
//! Handlers name the principal they serve in their signature and get session
//! plus tenant resolution for free. A staff route takes [`StaffSession`], a
//! customer portal route takes [`CustomerSession`], a technician portal route
//! takes [`TechnicianSession`]. Routes that need an identity but no tenant
//! (company switching, profile) take [`AuthnUser`].

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{instrument, trace};

use crate::{
    auth::session,
    db::{
        handlers::{Companies, Customers, Technicians, Users},
        models::{
            companies::MemberRole,
            customers::CustomerDBResponse,
            technicians::TechnicianDBResponse,
            users::UserDBResponse,
        },
    },
    errors::{Error, Result},
    types::CompanyId,
    AppState,
};

/// An authenticated identity with no tenant resolved yet.
#[derive(Debug, Clone)]
pub struct AuthnUser(pub UserDBResponse);

/// A staff caller operating inside their active company.
#[derive(Debug, Clone)]
pub struct StaffSession {
    pub user: UserDBResponse,
    pub company_id: CompanyId,
    pub role: MemberRole,
}

/// A customer portal caller. The company comes from the linked profile row,
/// never from request input.
#[derive(Debug, Clone)]
pub struct CustomerSession {
    pub user: UserDBResponse,
    pub company_id: CompanyId,
    pub customer: CustomerDBResponse,
}

/// A technician portal caller.
#[derive(Debug, Clone)]
pub struct TechnicianSession {
    pub user: UserDBResponse,
    pub company_id: CompanyId,
    pub technician: TechnicianDBResponse,
}

/// Pull the session token out of the cookie header, if any.
fn session_token(parts: &Parts, config: &crate::config::Config) -> Option<String> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;
    let cookie_name = &config.session.cookie_name;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=') {
            if name == cookie_name {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Resolve the cookie to a live auth identity.
///
/// Every failure on this path collapses to the same bare 401: a missing
/// cookie, a bad signature, an unknown subject, and a deactivated account
/// are indistinguishable to the caller.
#[instrument(skip(parts, state))]
async fn resolve_identity(parts: &Parts, state: &AppState) -> Result<UserDBResponse> {
    let token = match session_token(parts, &state.config) {
        Some(token) => token,
        None => {
            trace!("No session cookie present");
            return Err(Error::Unauthenticated { message: None });
        }
    };

    let claims = session::verify_session_token(&token, &state.config)?;

    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let user = Users::new(&mut conn).get_by_id(claims.sub).await?;

    match user {
        Some(user) if user.is_active => Ok(user),
        _ => {
            trace!("Session subject missing or deactivated");
            Err(Error::Unauthenticated { message: None })
        }
    }
}

impl FromRequestParts<AppState> for AuthnUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        Ok(AuthnUser(resolve_identity(parts, state).await?))
    }
}

impl FromRequestParts<AppState> for StaffSession {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = resolve_identity(parts, state).await?;

        let company_id = user.active_company_id.ok_or_else(|| Error::BadRequest {
            message: "No active company".to_string(),
        })?;

        // The pointer alone is not enough: the membership row must still
        // exist and carry a staff-level role.
        let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
        let member = Companies::new(&mut conn).get_member(company_id, user.id).await?;

        match member {
            Some(member) if matches!(member.role, MemberRole::Owner | MemberRole::Staff) => Ok(StaffSession {
                user,
                company_id,
                role: member.role,
            }),
            _ => Err(Error::BadRequest {
                message: "No active company".to_string(),
            }),
        }
    }
}

impl FromRequestParts<AppState> for CustomerSession {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = resolve_identity(parts, state).await?;

        let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
        let customer = Customers::new(&mut conn).get_by_portal_user(user.id).await?;

        match customer {
            Some(customer) => Ok(CustomerSession {
                company_id: customer.company_id,
                user,
                customer,
            }),
            None => {
                trace!("Identity has no linked customer profile");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}

impl FromRequestParts<AppState> for TechnicianSession {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = resolve_identity(parts, state).await?;

        let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
        let technician = Technicians::new(&mut conn).get_by_portal_user(user.id).await?;

        match technician {
            Some(technician) if technician.is_active => Ok(TechnicianSession {
                company_id: technician.company_id,
                user,
                technician,
            }),
            _ => {
                trace!("Identity has no linked active technician profile");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}
