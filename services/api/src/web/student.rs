//! services/api/src/web/student.rs
//!
//! Student-only endpoints. The router gates these behind `require_student`.

use crate::credentials::Claims;
use crate::error::{Envelope, ServiceError};
use crate::operations::notifications::{self, MarkedRead};
use crate::operations::{courses, student, student::LogActivityRequest};
use crate::web::{state::AppState, ApiJson, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use mentorsphere_core::views::{ActivitySummary, StudentDashboard};
use mentorsphere_core::{ActivityLog, Course, Notification};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/student/dashboard",
    tag = "student",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard for the signed-in student", body = StudentDashboard),
        (status = 403, description = "Caller is not a student")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<StudentDashboard> {
    Ok(Envelope::data(student::dashboard(&state.repos, &claims.sub).await?))
}

#[utoipa::path(
    get,
    path = "/api/student/courses",
    tag = "student",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Enrolled courses", body = [Course]))
)]
pub async fn courses_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Vec<Course>> {
    Ok(Envelope::data(
        courses::student_courses(&state.repos, &claims.sub).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/student/activity",
    tag = "student",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Recent activity with weekly chart", body = ActivitySummary))
)]
pub async fn activity_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<ActivitySummary> {
    Ok(Envelope::data(
        student::activity_summary(&state.repos, &claims.sub).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/student/activity",
    tag = "student",
    security(("bearer_auth" = [])),
    request_body = LogActivityRequest,
    responses(
        (status = 201, description = "Activity recorded", body = ActivityLog),
        (status = 400, description = "Invalid activity")
    )
)]
pub async fn log_activity_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<LogActivityRequest>,
) -> Result<(StatusCode, Json<Envelope<ActivityLog>>), ServiceError> {
    let log = student::log_activity(&state.repos, &claims.sub, req).await?;
    Ok((StatusCode::CREATED, Envelope::data(log)))
}

#[utoipa::path(
    get,
    path = "/api/student/notifications",
    tag = "student",
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

#[utoipa::path(
    put,
    path = "/api/student/notifications/{id}/read",
    tag = "student",
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
    path = "/api/student/notifications/read-all",
    tag = "student",
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
