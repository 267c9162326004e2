//! services/api/src/web/mentor.rs
//!
//! Mentor-only endpoints. The router gates these behind `require_mentor`.

use crate::credentials::Claims;
use crate::error::{Envelope, ServiceError};
use crate::operations::mentor::{self, CreateInterventionRequest, UpdateInterventionRequest};
use crate::operations::notifications::{self, MarkedRead};
use crate::web::{state::AppState, ApiJson, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use mentorsphere_core::views::{MentorDashboard, StudentDetail, StudentRiskRow};
use mentorsphere_core::{Intervention, Notification};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/mentor/dashboard",
    tag = "mentor",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard for the signed-in mentor", body = MentorDashboard),
        (status = 403, description = "Caller is not a mentor")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<MentorDashboard> {
    Ok(Envelope::data(mentor::dashboard(&state.repos, &claims.sub).await?))
}

#[utoipa::path(
    get,
    path = "/api/mentor/students",
    tag = "mentor",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Assigned students with risk data", body = [StudentRiskRow]))
)]
pub async fn students_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Vec<StudentRiskRow>> {
    Ok(Envelope::data(mentor::students(&state.repos, &claims.sub).await?))
}

#[utoipa::path(
    get,
    path = "/api/mentor/students/{id}",
    tag = "mentor",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Student account id")),
    responses(
        (status = 200, description = "Full detail of one assigned student", body = StudentDetail),
        (status = 403, description = "Student is not assigned to the caller"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn student_detail_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<StudentDetail> {
    Ok(Envelope::data(
        mentor::student_detail(&state.repos, &claims.sub, &id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/mentor/interventions",
    tag = "mentor",
    security(("bearer_auth" = [])),
    request_body = CreateInterventionRequest,
    responses(
        (status = 201, description = "Intervention sent", body = Intervention),
        (status = 404, description = "Student not found")
    )
)]
pub async fn create_intervention_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<CreateInterventionRequest>,
) -> Result<(StatusCode, Json<Envelope<Intervention>>), ServiceError> {
    let intervention = mentor::create_intervention(&state.repos, &claims.sub, req).await?;
    Ok((
        StatusCode::CREATED,
        Envelope::with_message("Intervention created", Some(intervention)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/mentor/interventions",
    tag = "mentor",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "The caller's interventions, newest first", body = [Intervention]))
)]
pub async fn list_interventions_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Vec<Intervention>> {
    Ok(Envelope::data(
        mentor::list_interventions(&state.repos, &claims.sub).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/mentor/interventions/{id}",
    tag = "mentor",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Intervention id")),
    request_body = UpdateInterventionRequest,
    responses(
        (status = 200, description = "Updated intervention", body = Intervention),
        (status = 403, description = "Intervention belongs to another mentor"),
        (status = 404, description = "Intervention not found")
    )
)]
pub async fn update_intervention_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateInterventionRequest>,
) -> ApiResult<Intervention> {
    Ok(Envelope::data(
        mentor::update_intervention(&state.repos, &claims.sub, &id, req).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/mentor/notifications",
    tag = "mentor",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Unread first, then newest", body = [Notification]))
)]
pub async fn notifications_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Vec<Notification>> {
    Ok(Envelope::data(
        notifications::inbox(&state.repos, &claims.sub).await?,
    ))
}

/// Marking an already read notification succeeds and changes nothing.
#[utoipa::path(
    put,
    path = "/api/mentor/notifications/{id}/read",
    tag = "mentor",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "The notification, now read", body = Notification),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_read_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<Notification> {
    Ok(Envelope::data(
        notifications::mark_read(&state.repos, &claims.sub, &id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/mentor/notifications/read-all",
    tag = "mentor",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "How many notifications changed", body = MarkedRead))
)]
pub async fn mark_all_read_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<MarkedRead> {
    Ok(Envelope::data(
        notifications::mark_all_read(&state.repos, &claims.sub).await?,
    ))
}
