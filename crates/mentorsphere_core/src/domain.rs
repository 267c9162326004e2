//! crates/mentorsphere_core/src/domain.rs
//!
//! Defines the core data structures for the learning platform.
//! The same shapes are used as stored documents and as wire payloads, so every
//! type serializes with camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

//=========================================================================================
// Accounts
//=========================================================================================

/// The role claim carried by every account and every session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Mentor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Mentor => "mentor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "mentor" => Ok(Role::Mentor),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Represents a student or mentor - the public view used throughout the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub university: String,
    pub joined_date: DateTime<Utc>,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    #[serde(default)]
    pub assigned_students: Vec<String>,
    /// Minutes.
    #[serde(default)]
    pub total_study_time: u32,
    #[serde(default)]
    pub completed_modules: u32,
    #[serde(default)]
    pub risk_score: u8,
}

// The stored form of an account - contains the password hash and is never sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCredentials {
    #[serde(flatten)]
    pub account: Account,
    pub password_hash: String,
}

//=========================================================================================
// Courses
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Video,
    Reading,
    Quiz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleStatus {
    Locked,
    InProgress,
    Completed,
}

/// A single unit of a course. `id` is unique within its course only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: u32,
    pub title: String,
    /// Minutes.
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: ModuleKind,
    pub status: ModuleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub total_modules: u32,
    #[serde(default)]
    pub completed_modules: u32,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Course {
    pub fn module(&self, module_id: u32) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }
}

//=========================================================================================
// Activity
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Video,
    Reading,
    Quiz,
}

/// One study session. Append-only: never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(default)]
    pub title: String,
    /// Minutes.
    pub duration: u32,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub course_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

//=========================================================================================
// Mentoring
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InterventionKind {
    Reminder,
    Meeting,
    Resource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InterventionStatus {
    Sent,
    Scheduled,
    Completed,
    Cancelled,
}

/// A mentor action targeted at one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub mentor_id: String,
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub message: String,
    pub status: InterventionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Human readable display label, e.g. "2 hours ago".
    #[serde(default)]
    pub time: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

//=========================================================================================
// Reflection
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FactorStatus {
    Excellent,
    Good,
    Moderate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyReflection {
    pub date: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub mood: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyInsight {
    pub week_number: u32,
    pub total_study_time: u32,
    pub average_daily: u32,
    pub top_subjects: Vec<String>,
    pub insights: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTopic {
    pub title: String,
    pub priority: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub current_phase: String,
    pub progress: u8,
    pub next_milestone: String,
    pub estimated_completion: String,
    pub suggested_topics: Vec<SuggestedTopic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    pub name: String,
    pub value: u8,
    pub status: FactorStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub factors: Vec<RiskFactor>,
    pub explanation: String,
    pub recommendations: Vec<String>,
}

/// Per-account singleton, cached in the store as a convenience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    #[serde(default)]
    pub user_id: String,
    pub daily: DailyReflection,
    pub weekly: WeeklyInsight,
    pub learning_path: LearningPath,
    pub risk_assessment: RiskAssessment,
}

//=========================================================================================
// Settings
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub study_reminder: bool,
    pub weekly_report: bool,
    pub mentor_messages: bool,
    pub course_updates: bool,
    pub promotions: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            study_reminder: true,
            weekly_report: true,
            mentor_messages: true,
            course_updates: false,
            promotions: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub theme: String,
    pub language: String,
    pub font_size: String,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme: "system".to_string(),
            language: "id".to_string(),
            font_size: "medium".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub profile_visibility: String,
    pub show_activity: bool,
    pub show_progress: bool,
    pub allow_analytics: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visibility: "public".to_string(),
            show_activity: true,
            show_progress: true,
            allow_analytics: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningSettings {
    /// Minutes per day.
    pub daily_goal: u32,
    pub reminder_time: String,
    pub autoplay_videos: bool,
    pub subtitles: bool,
}

impl Default for LearningSettings {
    fn default() -> Self {
        Self {
            daily_goal: 60,
            reminder_time: "08:00".to_string(),
            autoplay_videos: true,
            subtitles: true,
        }
    }
}

/// Per-account singleton keyed by the account id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_id: String,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
    #[serde(default)]
    pub privacy: PrivacySettings,
    #[serde(default)]
    pub learning: LearningSettings,
}

impl UserSettings {
    /// The settings every new account starts with.
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            notifications: NotificationSettings::default(),
            appearance: AppearanceSettings::default(),
            privacy: PrivacySettings::default(),
            learning: LearningSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credentials_flatten_into_one_document() {
        let creds = AccountCredentials {
            account: Account {
                id: "7".to_string(),
                name: "Ada".to_string(),
                email: "ada@x.com".to_string(),
                role: Role::Student,
                avatar: String::new(),
                bio: String::new(),
                location: String::new(),
                phone: String::new(),
                university: String::new(),
                joined_date: Utc::now(),
                enrolled_courses: vec![],
                assigned_students: vec![],
                total_study_time: 0,
                completed_modules: 0,
                risk_score: 50,
            },
            password_hash: "$argon2id$...".to_string(),
        };

        let doc = serde_json::to_value(&creds).unwrap();
        assert_eq!(doc["email"], "ada@x.com");
        assert_eq!(doc["role"], "student");
        assert_eq!(doc["passwordHash"], "$argon2id$...");

        // The public view never carries the hash.
        let public = serde_json::to_value(&creds.account).unwrap();
        assert!(public.get("passwordHash").is_none());
    }

    #[test]
    fn module_uses_wire_names() {
        let module: Module = serde_json::from_value(json!({
            "id": 3,
            "title": "Linear Regression",
            "duration": 90,
            "type": "reading",
            "status": "in-progress"
        }))
        .unwrap();
        assert_eq!(module.kind, ModuleKind::Reading);
        assert_eq!(module.status, ModuleStatus::InProgress);
        assert_eq!(module.score, None);
    }

    #[test]
    fn role_parses_from_claim_strings() {
        assert_eq!("mentor".parse::<Role>(), Ok(Role::Mentor));
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Student.to_string(), "student");
    }
}
