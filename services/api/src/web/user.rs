//! services/api/src/web/user.rs
//!
//! Endpoints for the caller's own profile, settings and credentials.

use crate::credentials::Claims;
use crate::error::Envelope;
use crate::operations::profile::{
    self, AccountDeletion, ChangePasswordRequest, DeleteAccountRequest, UpdateAvatarRequest,
    UpdateProfileRequest,
};
use crate::web::{state::AppState, ApiJson, ApiResult};
use axum::{
    extract::{Path, State},
    Extension,
};
use mentorsphere_core::views::Profile;
use mentorsphere_core::{Account, UserSettings};
use serde_json::Value;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = "user",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile with stats and badges", body = Profile),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Profile> {
    Ok(Envelope::data(
        profile::get_profile(&state.repos, &claims.sub).await?,
    ))
}

/// Only non-empty fields are applied.
#[utoipa::path(
    put,
    path = "/api/user/profile",
    tag = "user",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Updated account", body = Account))
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Account> {
    Ok(Envelope::data(
        profile::update_profile(&state.repos, &claims.sub, req).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/user/avatar",
    tag = "user",
    security(("bearer_auth" = [])),
    request_body = UpdateAvatarRequest,
    responses((status = 200, description = "Updated account", body = Account))
)]
pub async fn update_avatar_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<UpdateAvatarRequest>,
) -> ApiResult<Account> {
    Ok(Envelope::data(
        profile::update_avatar(&state.repos, &claims.sub, req).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/user/settings",
    tag = "user",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All settings sections", body = UserSettings))
)]
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<UserSettings> {
    Ok(Envelope::data(
        profile::get_settings(&state.repos, &claims.sub).await?,
    ))
}

/// Partially updates one section: `notifications`, `appearance`, `privacy` or `learning`.
/// The body holds a subset of that section's fields; unknown fields are rejected.
#[utoipa::path(
    put,
    path = "/api/user/settings/{section}",
    tag = "user",
    security(("bearer_auth" = [])),
    params(("section" = String, Path, description = "Settings section name")),
    responses(
        (status = 200, description = "Updated settings", body = UserSettings),
        (status = 400, description = "Unknown section or invalid fields")
    )
)]
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(section): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<UserSettings> {
    Ok(Envelope::data(
        profile::update_settings(&state.repos, &claims.sub, &section, body).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/user/password",
    tag = "user",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password wrong or new password too short")
    )
)]
pub async fn change_password_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> ApiResult<()> {
    profile::change_password(&state.repos, &claims.sub, req).await?;
    Ok(Envelope::message("Password changed"))
}

/// Removes the account when the remote store is active. On the in-memory
/// dataset the outcome is `retained`.
#[utoipa::path(
    delete,
    path = "/api/user",
    tag = "user",
    security(("bearer_auth" = [])),
    request_body = DeleteAccountRequest,
    responses(
        (status = 200, description = "Deletion outcome", body = AccountDeletion),
        (status = 400, description = "Password is incorrect")
    )
)]
pub async fn delete_account_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<DeleteAccountRequest>,
) -> ApiResult<AccountDeletion> {
    let deletion = profile::delete_account(&state.repos, &claims.sub, req).await?;
    let message = deletion.message.clone();
    Ok(Envelope::with_message(message, Some(deletion)))
}
