//! Authentication handlers: login, signup, session management.

use crate::{
    api::models::{
        auth::{ChangePasswordRequest, LoginRequest, SignupRequest, UserResponse},
        common::Data,
    },
    auth::{
        password::{hash_password, verify_password},
        principal::AuthnUser,
        session::{clear_session_cookie, create_session_token, session_cookie},
    },
    db::{
        handlers::{Companies, Users},
        models::{companies::{CompanyCreateDBRequest, MemberRole}, users::UserCreateDBRequest},
    },
    errors::{Error, Result},
    AppState,
};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse, Json},
};
use sqlx::Acquire;
use tracing::info;

/// The one message every credential failure maps to. Unknown email, wrong
/// password and deactivated account are indistinguishable.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = Data<UserResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn login(State(state): State<AppState>, Json(data): Json<LoginRequest>) -> Result<impl IntoResponse> {
    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let mut users = Users::new(&mut conn);

    let auth = users.get_auth_by_email(data.email.trim()).await?;

    let auth = match auth {
        Some(auth) if auth.is_active => auth,
        _ => {
            return Err(Error::Unauthenticated {
                message: Some(INVALID_CREDENTIALS.to_string()),
            })
        }
    };

    let hash = auth.password_hash.as_deref().ok_or_else(|| Error::Unauthenticated {
        message: Some(INVALID_CREDENTIALS.to_string()),
    })?;

    if !verify_password(&data.password, hash)? {
        return Err(Error::Unauthenticated {
            message: Some(INVALID_CREDENTIALS.to_string()),
        });
    }

    let user = users.get_by_id(auth.id).await?.ok_or_else(|| Error::Unauthenticated {
        message: Some(INVALID_CREDENTIALS.to_string()),
    })?;

    let token = create_session_token(user.id, &user.email, &state.config)?;
    let cookie = session_cookie(&token, &state.config);

    info!(user_id = %user.id, "user logged in");
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(Data::new(UserResponse::from(user))),
    ))
}

/// Create a staff account plus its first company.
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    summary = "Sign up",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = Data<UserResponse>),
        (status = 400, description = "Invalid signup data"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn signup(State(state): State<AppState>, Json(data): Json<SignupRequest>) -> Result<impl IntoResponse> {
    let email = data.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::bad_request("A valid email address is required"));
    }
    if data.password.len() < 8 {
        return Err(Error::bad_request("Password must be at least 8 characters"));
    }
    if data.company_name.trim().is_empty() {
        return Err(Error::bad_request("Company name cannot be empty"));
    }

    let password_hash = hash_password(&data.password)?;

    // Identity, company, owner membership and the active-company pointer all
    // land in one transaction.
    let mut tx = state.db.begin().await.map_err(crate::db::errors::DbError::from)?;

    let user = {
        let mut users = Users::new(tx.acquire().await.map_err(crate::db::errors::DbError::from)?);
        users
            .create(&UserCreateDBRequest {
                email: email.clone(),
                password_hash: Some(password_hash),
                display_name: data.display_name.clone(),
            })
            .await?
    };

    let company = {
        let mut companies = Companies::new(tx.acquire().await.map_err(crate::db::errors::DbError::from)?);
        let company = companies
            .create(&CompanyCreateDBRequest {
                name: data.company_name.trim().to_string(),
            })
            .await?;
        companies.add_member(company.id, user.id, MemberRole::Owner).await?;
        company
    };

    let user = {
        let mut users = Users::new(tx.acquire().await.map_err(crate::db::errors::DbError::from)?);
        users.set_active_company(user.id, Some(company.id)).await?
    };

    tx.commit().await.map_err(crate::db::errors::DbError::from)?;

    let token = create_session_token(user.id, &user.email, &state.config)?;
    let cookie = session_cookie(&token, &state.config);

    info!(user_id = %user.id, company_id = %company.id, "account created");
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(Data::new(UserResponse::from(user))),
    ))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    summary = "Log out",
    responses(
        (status = 200, description = "Session cleared"),
    )
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_session_cookie(&state.config);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(Data::new(serde_json::json!({ "loggedOut": true }))),
    )
}

/// The authenticated identity behind the current session.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    summary = "Current identity",
    responses(
        (status = 200, description = "Current identity", body = Data<UserResponse>),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn me(AuthnUser(user): AuthnUser) -> Result<Json<Data<UserResponse>>> {
    Ok(Json(Data::new(UserResponse::from(user))))
}

/// Change the current identity's password.
#[utoipa::path(
    post,
    path = "/auth/change-password",
    tag = "auth",
    summary = "Change password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current password incorrect"),
        (status = 400, description = "New password too weak"),
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthnUser(user): AuthnUser,
    Json(data): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    if data.new_password.len() < 8 {
        return Err(Error::bad_request("Password must be at least 8 characters"));
    }

    let mut conn = state.db.acquire().await.map_err(crate::db::errors::DbError::from)?;
    let mut users = Users::new(&mut conn);

    let auth = users.get_auth_by_email(&user.email).await?.ok_or(Error::Unauthenticated { message: None })?;
    let hash = auth.password_hash.as_deref().ok_or(Error::Unauthenticated { message: None })?;

    if !verify_password(&data.current_password, hash)? {
        return Err(Error::Unauthenticated {
            message: Some("Current password is incorrect".to_string()),
        });
    }

    let new_hash = hash_password(&data.new_password)?;
    users.set_password_hash(user.id, &new_hash).await?;

    Ok(Json(Data::new(serde_json::json!({ "changed": true }))))
}
