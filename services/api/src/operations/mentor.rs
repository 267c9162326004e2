//! services/api/src/operations/mentor.rs
//!
//! Mentor views over their assigned students and the intervention lifecycle.

use crate::error::{ServiceError, ServiceResult};
use crate::operations::profile::daily_goal;
use crate::operations::reflection::current_reflection;
use crate::operations::notifications::inbox;
use crate::operations::{load_account, snapshot};
use chrono::{DateTime, Utc};
use mentorsphere_core::analytics::{
    mentor_stats, recent_interventions, risk_distribution, students_at_risk,
    weekly_activity, StudentSnapshot,
};
use mentorsphere_core::domain::{
    ActivityLog, Intervention, InterventionKind, InterventionStatus, Notification,
    NotificationKind, Role,
};
use mentorsphere_core::views::{MentorDashboard, StudentDetail, StudentRiskRow};
use mentorsphere_core::{Lookup, PortError, Query, Repositories, SortOrder};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;

const DASHBOARD_INTERVENTIONS: usize = 3;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterventionRequest {
    pub student_id: String,
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub message: String,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInterventionRequest {
    pub status: InterventionStatus,
    #[serde(default)]
    pub response: Option<String>,
}

//=========================================================================================
// Assigned students
//=========================================================================================

/// Snapshots of every assigned student that still has an account.
async fn assigned_snapshots(
    repos: &Repositories,
    mentor_id: &str,
) -> ServiceResult<Vec<StudentSnapshot>> {
    let mentor = load_account(repos, mentor_id).await?.account;
    let catalog = repos.courses.find_all().await?;

    let mut snapshots = Vec::with_capacity(mentor.assigned_students.len());
    for student_id in &mentor.assigned_students {
        match repos.users.find_by_id(student_id, Lookup::Exhaustive).await {
            Ok(credentials) => snapshots.push(snapshot(repos, credentials, &catalog).await?),
            Err(PortError::NotFound(_)) => {
                warn!(mentor_id, student_id = %student_id, "Assigned student has no account, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(snapshots)
}

async fn interventions_of(repos: &Repositories, mentor_id: &str) -> ServiceResult<Vec<Intervention>> {
    let query = Query::new()
        .filter("mentorId", mentor_id)
        .order_by("createdAt", SortOrder::Descending);
    Ok(recent_interventions(
        repos.interventions.find_by(&query).await?,
        usize::MAX,
    ))
}

pub async fn dashboard(repos: &Repositories, mentor_id: &str) -> ServiceResult<MentorDashboard> {
    let snapshots = assigned_snapshots(repos, mentor_id).await?;
    let interventions = interventions_of(repos, mentor_id).await?;
    let notifications = inbox(repos, mentor_id).await?;
    let now = Utc::now();

    let rows: Vec<StudentRiskRow> = snapshots.iter().map(|s| s.risk_row(now)).collect();
    let scores: Vec<u8> = snapshots.iter().map(|s| s.account.risk_score).collect();
    let all_logs: Vec<ActivityLog> = snapshots
        .iter()
        .flat_map(|s| s.activities.iter().cloned())
        .collect();

    Ok(MentorDashboard {
        stats: mentor_stats(&snapshots, &interventions, now),
        students_at_risk: students_at_risk(&rows),
        recent_interventions: recent_interventions(interventions, DASHBOARD_INTERVENTIONS),
        notifications,
        global_activity: weekly_activity(&all_logs, now),
        risk_distribution: risk_distribution(&scores),
    })
}

pub async fn students(repos: &Repositories, mentor_id: &str) -> ServiceResult<Vec<StudentRiskRow>> {
    let now = Utc::now();
    Ok(assigned_snapshots(repos, mentor_id)
        .await?
        .iter()
        .map(|s| s.risk_row(now))
        .collect())
}

/// Everything a mentor sees about one of their students.
pub async fn student_detail(
    repos: &Repositories,
    mentor_id: &str,
    student_id: &str,
) -> ServiceResult<StudentDetail> {
    let mentor = load_account(repos, mentor_id).await?.account;
    let credentials = load_account(repos, student_id).await?;
    if credentials.account.role != Role::Student {
        return Err(ServiceError::NotFound("Student not found".to_string()));
    }
    if !mentor.assigned_students.iter().any(|id| id == student_id) {
        return Err(ServiceError::Forbidden(
            "Student is not assigned to you".to_string(),
        ));
    }

    let catalog = repos.courses.find_all().await?;
    let snapshot = snapshot(repos, credentials, &catalog).await?;
    let goal = daily_goal(repos, student_id).await?;
    let now = Utc::now();

    let history_query = Query::new().filter("studentId", student_id);
    let intervention_history =
        recent_interventions(repos.interventions.find_by(&history_query).await?, usize::MAX);

    Ok(StudentDetail {
        summary: snapshot.risk_row(now),
        weekly_activity: weekly_activity(&snapshot.activities, now),
        ai_insights: current_reflection(repos, student_id).await?,
        performance_metrics: snapshot.performance(goal, now),
        intervention_history,
        user: snapshot.account,
        activity_log: snapshot.activities,
    })
}

//=========================================================================================
// Interventions
//=========================================================================================

/// Records a new intervention (status `sent`) and notifies the student.
pub async fn create_intervention(
    repos: &Repositories,
    mentor_id: &str,
    req: CreateInterventionRequest,
) -> ServiceResult<Intervention> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(ServiceError::BadRequest("Message is required".to_string()));
    }

    let student = match repos.users.find_by_id(&req.student_id, Lookup::Exhaustive).await {
        Ok(credentials) if credentials.account.role == Role::Student => credentials.account,
        Ok(_) | Err(PortError::NotFound(_)) => {
            return Err(ServiceError::NotFound("Student not found".to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    let mentor = load_account(repos, mentor_id).await?.account;
    let now = Utc::now();

    let intervention = repos
        .interventions
        .create(Intervention {
            id: String::new(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            mentor_id: mentor_id.to_string(),
            kind: req.kind,
            message: message.clone(),
            status: InterventionStatus::Sent,
            created_at: now,
            response: None,
            scheduled_date: req.scheduled_date,
            attachments: req.attachments,
        })
        .await?;

    let notice = Notification {
        id: String::new(),
        user_id: student.id.clone(),
        kind: NotificationKind::Info,
        title: format!("New message from {}", mentor.name),
        message,
        time: "just now".to_string(),
        created_at: now,
        read: false,
    };
    if let Err(e) = repos.notifications.create(notice).await {
        warn!(intervention_id = %intervention.id, error = %e, "Could not notify the student");
    }

    info!(mentor_id, student_id = %student.id, intervention_id = %intervention.id, "Intervention created");
    Ok(intervention)
}

/// The mentor's interventions, newest first.
pub async fn list_interventions(
    repos: &Repositories,
    mentor_id: &str,
) -> ServiceResult<Vec<Intervention>> {
    interventions_of(repos, mentor_id).await
}

pub async fn update_intervention(
    repos: &Repositories,
    mentor_id: &str,
    intervention_id: &str,
    req: UpdateInterventionRequest,
) -> ServiceResult<Intervention> {
    let not_found = || ServiceError::NotFound("Intervention not found".to_string());

    let existing = match repos
        .interventions
        .find_by_id(intervention_id, Lookup::Strict)
        .await
    {
        Ok(existing) => existing,
        Err(PortError::NotFound(_)) => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };
    if existing.mentor_id != mentor_id {
        return Err(ServiceError::Forbidden(
            "Intervention belongs to another mentor".to_string(),
        ));
    }

    let status = req.status;
    let response = req.response.filter(|r| !r.trim().is_empty());
    let updated = repos
        .interventions
        .modify(intervention_id, move |item: &mut Intervention| {
            item.status = status;
            if let Some(text) = &response {
                item.response = Some(text.clone());
            }
            Ok(())
        })
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => not_found(),
            other => other.into(),
        })?;

    info!(intervention_id, status = ?updated.status, "Intervention updated");
    Ok(updated)
}
