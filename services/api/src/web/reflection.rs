//! services/api/src/web/reflection.rs
//!
//! Reflection endpoints, available to every signed-in role.

use crate::credentials::Claims;
use crate::error::Envelope;
use crate::operations::reflection::{self, DailyParams, WeeklyParams};
use crate::web::{state::AppState, ApiResult};
use axum::{
    extract::{Query, State},
    Extension,
};
use mentorsphere_core::domain::{
    DailyReflection, LearningPath, Reflection, RiskAssessment, WeeklyInsight,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/reflections",
    tag = "reflections",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Latest reflection or the default template", body = Reflection))
)]
pub async fn get_reflection_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Reflection> {
    Ok(Envelope::data(
        reflection::current_reflection(&state.repos, &claims.sub).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/reflections/generate",
    tag = "reflections",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "A freshly generated reflection", body = Reflection))
)]
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Reflection> {
    Ok(Envelope::data(
        reflection::generate(&state.repos, &claims.sub).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reflections/daily",
    tag = "reflections",
    security(("bearer_auth" = [])),
    params(DailyParams),
    responses((status = 200, description = "Daily reflection", body = DailyReflection))
)]
pub async fn daily_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<DailyParams>,
) -> ApiResult<DailyReflection> {
    Ok(Envelope::data(
        reflection::daily(&state.repos, &claims.sub, params).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reflections/weekly",
    tag = "reflections",
    security(("bearer_auth" = [])),
    params(WeeklyParams),
    responses((status = 200, description = "Weekly insight", body = WeeklyInsight))
)]
pub async fn weekly_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<WeeklyParams>,
) -> ApiResult<WeeklyInsight> {
    Ok(Envelope::data(
        reflection::weekly(&state.repos, &claims.sub, params).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reflections/learning-path",
    tag = "reflections",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Learning path", body = LearningPath))
)]
pub async fn learning_path_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<LearningPath> {
    Ok(Envelope::data(
        reflection::learning_path(&state.repos, &claims.sub).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reflections/risk-assessment",
    tag = "reflections",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Risk assessment", body = RiskAssessment))
)]
pub async fn risk_assessment_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<RiskAssessment> {
    Ok(Envelope::data(
        reflection::risk_assessment(&state.repos, &claims.sub).await?,
    ))
}
