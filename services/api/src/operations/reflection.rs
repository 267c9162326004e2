//! services/api/src/operations/reflection.rs
//!
//! Template-generated reflections. A stored reflection is only a cache of the
//! last generated one; accounts without one get the default template, with a
//! risk assessment computed from their own records.

use crate::error::ServiceResult;
use crate::operations::profile::daily_goal;
use crate::operations::{activities_of, load_account};
use chrono::Utc;
use mentorsphere_core::analytics::{enrolled_courses, risk_factors};
use mentorsphere_core::domain::{
    DailyReflection, LearningPath, Reflection, RiskAssessment, Role, WeeklyInsight,
};
use mentorsphere_core::reflection::{assess_risk, default_reflection, regenerate};
use mentorsphere_core::{Lookup, PortError, Repositories};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DailyParams {
    /// Date label to show, e.g. `2024-05-15`.
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeeklyParams {
    /// Week number to show.
    pub week: Option<u32>,
}

/// The stored reflection, or the default template for this account.
pub async fn current_reflection(repos: &Repositories, user_id: &str) -> ServiceResult<Reflection> {
    match repos.reflections.find_by_id(user_id, Lookup::Strict).await {
        Ok(stored) => return Ok(stored),
        Err(PortError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let now = Utc::now();
    let mut reflection = default_reflection(user_id, now);
    let account = load_account(repos, user_id).await?.account;
    if account.role == Role::Student {
        let catalog = repos.courses.find_all().await?;
        let courses = enrolled_courses(&account, &catalog);
        let logs = activities_of(repos, user_id).await?;
        let goal = daily_goal(repos, user_id).await?;
        reflection.risk_assessment = assess_risk(risk_factors(&logs, &courses, goal, now));
    }
    Ok(reflection)
}

/// Re-renders the reflection with fresh random content and caches it.
pub async fn generate(repos: &Repositories, user_id: &str) -> ServiceResult<Reflection> {
    let mut reflection = current_reflection(repos, user_id).await?;
    {
        let mut rng = rand::thread_rng();
        regenerate(&mut reflection, &mut rng, Utc::now());
    }
    reflection.user_id = user_id.to_string();
    repos.reflections.put(&reflection).await?;

    info!(user_id, risk_score = reflection.risk_assessment.score, "Reflection generated");
    Ok(reflection)
}

pub async fn daily(
    repos: &Repositories,
    user_id: &str,
    params: DailyParams,
) -> ServiceResult<DailyReflection> {
    let mut daily = current_reflection(repos, user_id).await?.daily;
    if let Some(date) = params.date.filter(|d| !d.trim().is_empty()) {
        daily.date = date;
    }
    Ok(daily)
}

pub async fn weekly(
    repos: &Repositories,
    user_id: &str,
    params: WeeklyParams,
) -> ServiceResult<WeeklyInsight> {
    let mut weekly = current_reflection(repos, user_id).await?.weekly;
    if let Some(week) = params.week {
        weekly.week_number = week;
    }
    Ok(weekly)
}

pub async fn learning_path(repos: &Repositories, user_id: &str) -> ServiceResult<LearningPath> {
    Ok(current_reflection(repos, user_id).await?.learning_path)
}

pub async fn risk_assessment(repos: &Repositories, user_id: &str) -> ServiceResult<RiskAssessment> {
    Ok(current_reflection(repos, user_id).await?.risk_assessment)
}
