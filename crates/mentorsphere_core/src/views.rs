//! crates/mentorsphere_core/src/views.rs
//!
//! Read-only summaries assembled from stored records. None of these are
//! persisted; they are rebuilt on every request.

use crate::domain::{
    Account, ActivityLog, Intervention, ModuleKind, ModuleStatus, Notification, Reflection,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Activity
//=========================================================================================

/// Minutes and session count for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyActivity {
    pub day: String,
    pub study_time: u32,
    pub activities: u32,
}

/// Minutes spent per activity kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityBreakdown {
    pub video: u32,
    pub reading: u32,
    pub quiz: u32,
}

impl ActivityBreakdown {
    pub fn total(&self) -> u32 {
        self.video + self.reading + self.quiz
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub activities: Vec<ActivityLog>,
    pub weekly_data: Vec<WeeklyActivity>,
    pub breakdown: ActivityBreakdown,
    pub total_time: u32,
}

//=========================================================================================
// Courses
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizEntry {
    pub id: u32,
    pub title: String,
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: ModuleKind,
    pub status: ModuleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub total_quizzes: u32,
    pub completed_quizzes: u32,
    /// Mean over scored quizzes only; 0 when nothing is scored.
    pub average_score: f64,
    pub quizzes: Vec<QuizEntry>,
}

//=========================================================================================
// Dashboards
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub title: String,
    pub message: String,
    /// "positive", "neutral" or "warning".
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub name: String,
    pub avatar: String,
    pub total_study_time: u32,
    pub completed_modules: u32,
    pub enrolled_courses: u32,
    pub average_progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub user: DashboardUser,
    pub recent_activity: Vec<ActivityLog>,
    pub weekly_activity: Vec<WeeklyActivity>,
    pub ai_insight: Insight,
}

/// One row of the mentor's student table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRiskRow {
    pub id: String,
    pub name: String,
    pub risk_score: u8,
    /// `YYYY-MM-DD`.
    pub last_active: String,
    pub progress: u8,
    /// "improving", "stable" or "declining".
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskDistribution {
    pub level: String,
    pub count: u32,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorStats {
    pub total_students: u32,
    pub active_students: u32,
    pub average_progress: f64,
    pub students_at_risk: u32,
    pub interventions_this_week: u32,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorDashboard {
    pub stats: MentorStats,
    pub students_at_risk: Vec<StudentRiskRow>,
    pub recent_interventions: Vec<Intervention>,
    pub notifications: Vec<Notification>,
    pub global_activity: Vec<WeeklyActivity>,
    pub risk_distribution: Vec<RiskDistribution>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub average_quiz_score: f64,
    pub completion_rate: f64,
    pub engagement_score: f64,
    pub consistency_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    #[serde(flatten)]
    pub summary: StudentRiskRow,
    pub user: Account,
    pub activity_log: Vec<ActivityLog>,
    pub weekly_activity: Vec<WeeklyActivity>,
    pub ai_insights: Reflection,
    pub intervention_history: Vec<Intervention>,
    pub performance_metrics: PerformanceMetrics,
}

//=========================================================================================
// Profile
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_study_time: u32,
    pub modules_completed: u32,
    pub courses_enrolled: u32,
    pub certificates: u32,
    pub badges: u32,
    /// Consecutive days with at least one activity, ending today or yesterday.
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Badge {
    pub id: u32,
    pub name: String,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(flatten)]
    pub account: Account,
    pub stats: UserStats,
    pub badges: Vec<Badge>,
    pub recent_activity: Vec<ActivityLog>,
}
