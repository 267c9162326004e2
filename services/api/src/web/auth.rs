//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for login, registration, logout and the current user.

use crate::credentials::Claims;
use crate::error::{Envelope, ServiceError};
use crate::operations::auth::{self, AuthSession, LoginRequest, RegisterRequest};
use crate::web::{state::AppState, ApiJson, ApiResult};
use axum::{extract::State, http::StatusCode, Extension, Json};
use mentorsphere_core::Account;
use std::sync::Arc;

/// POST /api/auth/login - Exchange credentials for a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthSession),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<AuthSession> {
    let session = auth::login(&state.repos, &state.tokens, req).await?;
    Ok(Envelope::data(session))
}

/// POST /api/auth/register - Create an account and sign it in
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthSession),
        (status = 400, description = "Invalid fields or email already registered")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<AuthSession>>), ServiceError> {
    let session = auth::register(&state.repos, &state.tokens, req).await?;
    Ok((
        StatusCode::CREATED,
        Envelope::with_message("Registration successful", Some(session)),
    ))
}

/// POST /api/auth/logout - Tokens are stateless, so this only acknowledges the client
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Logout acknowledged"))
)]
pub async fn logout_handler() -> Json<Envelope<()>> {
    Envelope::message("Logged out")
}

/// GET /api/auth/me - The account behind the presented token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = Account),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Account> {
    let account = auth::current_user(&state.repos, &claims.sub).await?;
    Ok(Envelope::data(account))
}
