//! services/api/src/operations/student.rs
//!
//! The student-facing views: dashboard and activity history, plus logging a
//! new study session.

use crate::error::{ServiceError, ServiceResult};
use crate::operations::profile::daily_goal;
use crate::operations::{activities_of, load_account};
use chrono::Utc;
use mentorsphere_core::analytics::{
    activity_breakdown, average_progress, enrolled_courses, recent_activity, student_insight,
    weekly_activity,
};
use mentorsphere_core::domain::{AccountCredentials, ActivityKind, ActivityLog};
use mentorsphere_core::views::{ActivitySummary, DashboardUser, StudentDashboard};
use mentorsphere_core::Repositories;
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;

const DASHBOARD_RECENT_ACTIVITY: usize = 5;
const ACTIVITY_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogActivityRequest {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub score: Option<u8>,
}

pub async fn dashboard(repos: &Repositories, user_id: &str) -> ServiceResult<StudentDashboard> {
    let account = load_account(repos, user_id).await?.account;
    let catalog = repos.courses.find_all().await?;
    let courses = enrolled_courses(&account, &catalog);
    let logs = activities_of(repos, user_id).await?;
    let goal = daily_goal(repos, user_id).await?;
    let now = Utc::now();

    let progress = average_progress(&courses);
    let weekly = weekly_activity(&logs, now);
    let insight = student_insight(progress, &weekly, goal);

    Ok(StudentDashboard {
        user: DashboardUser {
            name: account.name,
            avatar: account.avatar,
            total_study_time: account.total_study_time,
            completed_modules: account.completed_modules,
            enrolled_courses: courses.len() as u32,
            average_progress: progress,
        },
        recent_activity: recent_activity(logs, DASHBOARD_RECENT_ACTIVITY),
        weekly_activity: weekly,
        ai_insight: insight,
    })
}

/// Recent sessions with a weekly chart and a per-kind breakdown of those sessions.
pub async fn activity_summary(repos: &Repositories, user_id: &str) -> ServiceResult<ActivitySummary> {
    let logs = activities_of(repos, user_id).await?;
    let weekly_data = weekly_activity(&logs, Utc::now());
    let activities = recent_activity(logs, ACTIVITY_HISTORY_LIMIT);
    let breakdown = activity_breakdown(&activities);
    let total_time = breakdown.total();

    Ok(ActivitySummary {
        activities,
        weekly_data,
        breakdown,
        total_time,
    })
}

/// Appends a study session and adds its minutes to the account's total.
pub async fn log_activity(
    repos: &Repositories,
    user_id: &str,
    req: LogActivityRequest,
) -> ServiceResult<ActivityLog> {
    if req.duration == 0 {
        return Err(ServiceError::BadRequest(
            "Duration must be at least one minute".to_string(),
        ));
    }
    if req.score.is_some_and(|s| s > 100) {
        return Err(ServiceError::BadRequest(
            "Score must be between 0 and 100".to_string(),
        ));
    }
    // Fail before writing anything if the caller has no account.
    load_account(repos, user_id).await?;

    let log = repos
        .activities
        .create(ActivityLog {
            id: String::new(),
            user_id: user_id.to_string(),
            kind: req.kind,
            title: req.title.trim().to_string(),
            duration: req.duration,
            date: Utc::now(),
            course_id: req.course_id.unwrap_or_default(),
            score: req.score,
        })
        .await?;

    let minutes = log.duration;
    if let Err(e) = repos
        .users
        .modify(user_id, move |creds: &mut AccountCredentials| {
            creds.account.total_study_time = creds.account.total_study_time.saturating_add(minutes);
            Ok(())
        })
        .await
    {
        warn!(user_id, error = %e, "Activity logged but study time was not updated");
        return Err(e.into());
    }

    info!(user_id, activity_id = %log.id, minutes, "Activity logged");
    Ok(log)
}
