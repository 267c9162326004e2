//! services/api/src/web/courses.rs
//!
//! Course catalogue endpoints, available to every signed-in role.

use crate::error::{Envelope, ServiceError};
use crate::operations::courses::{self, UpdateModuleRequest};
use crate::web::{state::AppState, ApiJson, ApiResult};
use axum::extract::{Path, State};
use mentorsphere_core::views::QuizSummary;
use mentorsphere_core::{Course, Module};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "courses",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All courses", body = [Course]))
)]
pub async fn list_courses_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Course>> {
    Ok(Envelope::data(courses::list_courses(&state.repos).await?))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "courses",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "The course", body = Course),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Course> {
    Ok(Envelope::data(courses::get_course(&state.repos, &id).await?))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/modules",
    tag = "courses",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Modules in course order", body = [Module]),
        (status = 404, description = "Course not found")
    )
)]
pub async fn course_modules_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Module>> {
    Ok(Envelope::data(courses::course_modules(&state.repos, &id).await?))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}/modules/{moduleId}",
    tag = "courses",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Course id"),
        ("moduleId" = u32, Path, description = "Module id within the course")
    ),
    request_body = UpdateModuleRequest,
    responses(
        (status = 200, description = "The updated course", body = Course),
        (status = 404, description = "Course or module not found")
    )
)]
pub async fn update_module_handler(
    State(state): State<Arc<AppState>>,
    Path((id, module_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<UpdateModuleRequest>,
) -> ApiResult<Course> {
    let module_id: u32 = module_id
        .parse()
        .map_err(|_| ServiceError::BadRequest(format!("Invalid module id '{}'", module_id)))?;
    Ok(Envelope::data(
        courses::update_module_status(&state.repos, &id, module_id, req).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/quiz-summary",
    tag = "courses",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Quiz results of the course", body = QuizSummary),
        (status = 404, description = "Course not found")
    )
)]
pub async fn quiz_summary_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<QuizSummary> {
    Ok(Envelope::data(courses::quiz_summary(&state.repos, &id).await?))
}
