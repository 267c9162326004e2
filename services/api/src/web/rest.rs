//! services/api/src/web/rest.rs
//!
//! Contains the health endpoint and the master definition for the OpenAPI
//! specification.

use crate::error::Envelope;
use crate::web::{auth, courses, mentor, reflection, state::AppState, student, user, ApiResult};
use axum::extract::State;
use mentorsphere_core::Tier;
use serde::Serialize;
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::login_handler,
        auth::register_handler,
        auth::logout_handler,
        auth::me_handler,
        user::get_profile_handler,
        user::update_profile_handler,
        user::update_avatar_handler,
        user::get_settings_handler,
        user::update_settings_handler,
        user::change_password_handler,
        user::delete_account_handler,
        courses::list_courses_handler,
        courses::get_course_handler,
        courses::course_modules_handler,
        courses::update_module_handler,
        courses::quiz_summary_handler,
        student::dashboard_handler,
        student::courses_handler,
        student::activity_handler,
        student::log_activity_handler,
        student::notifications_handler,
        student::mark_read_handler,
        student::mark_all_read_handler,
        mentor::dashboard_handler,
        mentor::students_handler,
        mentor::student_detail_handler,
        mentor::create_intervention_handler,
        mentor::list_interventions_handler,
        mentor::update_intervention_handler,
        mentor::notifications_handler,
        mentor::mark_read_handler,
        mentor::mark_all_read_handler,
        reflection::get_reflection_handler,
        reflection::generate_handler,
        reflection::daily_handler,
        reflection::weekly_handler,
        reflection::learning_path_handler,
        reflection::risk_assessment_handler,
    ),
    components(schemas(
        Health,
        mentorsphere_core::settings::NotificationPatch,
        mentorsphere_core::settings::AppearancePatch,
        mentorsphere_core::settings::PrivacyPatch,
        mentorsphere_core::settings::LearningPatch,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login, registration and the current session."),
        (name = "user", description = "The caller's own profile, settings and credentials."),
        (name = "courses", description = "Course catalogue and module progress."),
        (name = "student", description = "Student dashboard, activity and notifications."),
        (name = "mentor", description = "Mentor dashboard, students, interventions and notifications."),
        (name = "reflections", description = "Template-generated learning reflections.")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//=========================================================================================
// Health
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    pub status: String,
    /// `remote` or `local`: which tier is currently serving reads and writes.
    pub storage: String,
}

/// Liveness probe, also reporting whether the service is running in fallback mode.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "auth",
    responses((status = 200, description = "Service is up", body = Health))
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> ApiResult<Health> {
    let storage = match state.repos.store.active_tier().await {
        Tier::Remote => "remote",
        Tier::Local => "local",
    };
    Ok(Envelope::data(Health {
        status: "ok".to_string(),
        storage: storage.to_string(),
    }))
}
