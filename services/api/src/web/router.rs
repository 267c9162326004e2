//! services/api/src/web/router.rs
//!
//! Builds the complete axum application: public and protected `/api` routes,
//! role gating, Swagger UI, CORS and request tracing.

use crate::config::Config;
use crate::error::ServiceError;
use crate::web::middleware::{require_auth, require_mentor, require_student};
use crate::web::{auth, courses, mentor, reflection, rest, state::AppState, student, user};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring an allowed origin that is not a valid header value");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
}

async fn route_not_found() -> ServiceError {
    ServiceError::NotFound("Route not found".to_string())
}

/// Assembles every route. Role gating runs after token validation and before
/// any handler touches storage.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(rest::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Any signed-in role
    let shared_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/user/profile",
            get(user::get_profile_handler).put(user::update_profile_handler),
        )
        .route("/user/avatar", put(user::update_avatar_handler))
        .route("/user/settings", get(user::get_settings_handler))
        .route("/user/settings/{section}", put(user::update_settings_handler))
        .route("/user/password", put(user::change_password_handler))
        .route("/user", delete(user::delete_account_handler))
        .route("/courses", get(courses::list_courses_handler))
        .route("/courses/{id}", get(courses::get_course_handler))
        .route("/courses/{id}/modules", get(courses::course_modules_handler))
        .route(
            "/courses/{id}/modules/{module_id}",
            put(courses::update_module_handler),
        )
        .route("/courses/{id}/quiz-summary", get(courses::quiz_summary_handler))
        .route("/reflections", get(reflection::get_reflection_handler))
        .route("/reflections/generate", post(reflection::generate_handler))
        .route("/reflections/daily", get(reflection::daily_handler))
        .route("/reflections/weekly", get(reflection::weekly_handler))
        .route("/reflections/learning-path", get(reflection::learning_path_handler))
        .route(
            "/reflections/risk-assessment",
            get(reflection::risk_assessment_handler),
        );

    let student_routes = Router::new()
        .route("/student/dashboard", get(student::dashboard_handler))
        .route("/student/courses", get(student::courses_handler))
        .route(
            "/student/activity",
            get(student::activity_handler).post(student::log_activity_handler),
        )
        .route("/student/notifications", get(student::notifications_handler))
        .route(
            "/student/notifications/read-all",
            put(student::mark_all_read_handler),
        )
        .route(
            "/student/notifications/{id}/read",
            put(student::mark_read_handler),
        )
        .route_layer(axum_middleware::from_fn(require_student));

    let mentor_routes = Router::new()
        .route("/mentor/dashboard", get(mentor::dashboard_handler))
        .route("/mentor/students", get(mentor::students_handler))
        .route("/mentor/students/{id}", get(mentor::student_detail_handler))
        .route(
            "/mentor/interventions",
            get(mentor::list_interventions_handler).post(mentor::create_intervention_handler),
        )
        .route(
            "/mentor/interventions/{id}",
            put(mentor::update_intervention_handler),
        )
        .route("/mentor/notifications", get(mentor::notifications_handler))
        .route(
            "/mentor/notifications/read-all",
            put(mentor::mark_all_read_handler),
        )
        .route(
            "/mentor/notifications/{id}/read",
            put(mentor::mark_read_handler),
        )
        .route_layer(axum_middleware::from_fn(require_mentor));

    // Protected routes (auth required); the token check wraps the role checks.
    let protected_routes = Router::new()
        .merge(shared_routes)
        .merge(student_routes)
        .merge(mentor_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let api_router = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", rest::ApiDoc::openapi()))
        .fallback(route_not_found)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
