//! services/api/src/web/mod.rs
//!
//! The axum layer: shared state, middleware, one handler module per route
//! group, the OpenAPI document and the router that ties them together.

pub mod auth;
pub mod courses;
pub mod mentor;
pub mod middleware;
pub mod reflection;
pub mod rest;
pub mod router;
pub mod state;
pub mod student;
pub mod user;

use crate::error::{Envelope, ServiceError};
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

pub use middleware::require_auth;
pub use router::build_router;
pub use state::AppState;

/// What every handler returns: the envelope on success, `ServiceError` otherwise.
pub type ApiResult<T> = Result<Json<Envelope<T>>, ServiceError>;

/// A JSON body whose rejections render as a `400` envelope instead of axum's
/// plain-text responses.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServiceError::BadRequest(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ))),
        }
    }
}
