//! services/api/src/web/middleware.rs
//!
//! Authentication and role-gating middleware for protected routes.

use crate::credentials::Claims;
use crate::error::ServiceError;
use crate::web::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use mentorsphere_core::Role;
use std::sync::Arc;
use tracing::debug;

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validates the bearer token and stores its `Claims` in the request extensions.
///
/// A missing, malformed, forged or expired token is rejected with 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ServiceError::Unauthorized("Authorization token is required".to_string()))?;

    let claims = state.tokens.validate(token).map_err(|e| {
        debug!(reason = %e, "Rejected session token");
        ServiceError::Unauthorized("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

async fn require_role(role: Role, req: Request, next: Next) -> Result<Response, ServiceError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| ServiceError::Unauthorized("Authorization token is required".to_string()))?;

    if claims.role != role {
        debug!(user_id = %claims.sub, required = %role, "Rejected request for the wrong role");
        return Err(ServiceError::Forbidden(format!(
            "This resource is only available to {}s",
            role
        )));
    }
    Ok(next.run(req).await)
}

/// Lets only students through. Must run after `require_auth`.
pub async fn require_student(req: Request, next: Next) -> Result<Response, ServiceError> {
    require_role(Role::Student, req, next).await
}

/// Lets only mentors through. Must run after `require_auth`.
pub async fn require_mentor(req: Request, next: Next) -> Result<Response, ServiceError> {
    require_role(Role::Mentor, req, next).await
}
