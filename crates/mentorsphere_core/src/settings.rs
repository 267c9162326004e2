//! crates/mentorsphere_core/src/settings.rs
//!
//! Partial updates to one section of a `UserSettings` record.

use crate::domain::{
    AppearanceSettings, LearningSettings, NotificationSettings, PrivacySettings, UserSettings,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Upper bound for `learning.dailyGoal`, in minutes.
pub const MAX_DAILY_GOAL: u32 = 24 * 60;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsError {
    #[error("Unknown settings section '{0}'")]
    UnknownSection(String),
    #[error("Invalid {section} settings: {reason}")]
    InvalidBody { section: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotificationPatch {
    pub email: Option<bool>,
    pub push: Option<bool>,
    pub study_reminder: Option<bool>,
    pub weekly_report: Option<bool>,
    pub mentor_messages: Option<bool>,
    pub course_updates: Option<bool>,
    pub promotions: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppearancePatch {
    pub theme: Option<String>,
    pub language: Option<String>,
    pub font_size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrivacyPatch {
    pub profile_visibility: Option<String>,
    pub show_activity: Option<bool>,
    pub show_progress: Option<bool>,
    pub allow_analytics: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LearningPatch {
    pub daily_goal: Option<u32>,
    pub reminder_time: Option<String>,
    pub autoplay_videos: Option<bool>,
    pub subtitles: Option<bool>,
}

impl LearningPatch {
    fn validated(self) -> Result<Self, SettingsError> {
        match self.daily_goal {
            Some(goal) if !(1..=MAX_DAILY_GOAL).contains(&goal) => Err(SettingsError::InvalidBody {
                section: "learning".to_string(),
                reason: format!("dailyGoal must be between 1 and {} minutes", MAX_DAILY_GOAL),
            }),
            _ => Ok(self),
        }
    }
}

/// An update to exactly one settings section. Absent fields keep their value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsPatch {
    Notifications(NotificationPatch),
    Appearance(AppearancePatch),
    Privacy(PrivacyPatch),
    Learning(LearningPatch),
}

fn parse<T: serde::de::DeserializeOwned>(section: &str, body: Value) -> Result<T, SettingsError> {
    serde_json::from_value(body).map_err(|e| SettingsError::InvalidBody {
        section: section.to_string(),
        reason: e.to_string(),
    })
}

fn set<T>(target: &mut T, value: &Option<T>)
where
    T: Clone,
{
    if let Some(v) = value {
        *target = v.clone();
    }
}

impl SettingsPatch {
    /// Decodes a request body for the named section.
    pub fn from_section(section: &str, body: Value) -> Result<Self, SettingsError> {
        match section {
            "notifications" => parse(section, body).map(Self::Notifications),
            "appearance" => parse(section, body).map(Self::Appearance),
            "privacy" => parse(section, body).map(Self::Privacy),
            "learning" => parse::<LearningPatch>(section, body)
                .and_then(LearningPatch::validated)
                .map(Self::Learning),
            other => Err(SettingsError::UnknownSection(other.to_string())),
        }
    }

    pub fn apply(&self, settings: &mut UserSettings) {
        match self {
            Self::Notifications(p) => apply_notifications(&mut settings.notifications, p),
            Self::Appearance(p) => apply_appearance(&mut settings.appearance, p),
            Self::Privacy(p) => apply_privacy(&mut settings.privacy, p),
            Self::Learning(p) => apply_learning(&mut settings.learning, p),
        }
    }
}

fn apply_notifications(s: &mut NotificationSettings, p: &NotificationPatch) {
    set(&mut s.email, &p.email);
    set(&mut s.push, &p.push);
    set(&mut s.study_reminder, &p.study_reminder);
    set(&mut s.weekly_report, &p.weekly_report);
    set(&mut s.mentor_messages, &p.mentor_messages);
    set(&mut s.course_updates, &p.course_updates);
    set(&mut s.promotions, &p.promotions);
}

fn apply_appearance(s: &mut AppearanceSettings, p: &AppearancePatch) {
    set(&mut s.theme, &p.theme);
    set(&mut s.language, &p.language);
    set(&mut s.font_size, &p.font_size);
}

fn apply_privacy(s: &mut PrivacySettings, p: &PrivacyPatch) {
    set(&mut s.profile_visibility, &p.profile_visibility);
    set(&mut s.show_activity, &p.show_activity);
    set(&mut s.show_progress, &p.show_progress);
    set(&mut s.allow_analytics, &p.allow_analytics);
}

fn apply_learning(s: &mut LearningSettings, p: &LearningPatch) {
    set(&mut s.daily_goal, &p.daily_goal);
    set(&mut s.reminder_time, &p.reminder_time);
    set(&mut s.autoplay_videos, &p.autoplay_videos);
    set(&mut s.subtitles, &p.subtitles);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_touches_only_given_fields() {
        let mut settings = UserSettings::defaults_for("1");
        let patch =
            SettingsPatch::from_section("appearance", json!({ "theme": "dark" })).unwrap();
        patch.apply(&mut settings);

        assert_eq!(settings.appearance.theme, "dark");
        assert_eq!(settings.appearance.language, "id");
        assert_eq!(settings.notifications, NotificationSettings::default());
    }

    #[test]
    fn learning_goal_is_typed() {
        let mut settings = UserSettings::defaults_for("1");
        SettingsPatch::from_section("learning", json!({ "dailyGoal": 90, "subtitles": false }))
            .unwrap()
            .apply(&mut settings);
        assert_eq!(settings.learning.daily_goal, 90);
        assert!(!settings.learning.subtitles);

        let err = SettingsPatch::from_section("learning", json!({ "dailyGoal": "lots" }))
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidBody { .. }));
    }

    #[test]
    fn unknown_sections_and_fields_are_rejected() {
        assert_eq!(
            SettingsPatch::from_section("billing", json!({})),
            Err(SettingsError::UnknownSection("billing".to_string()))
        );
        assert!(SettingsPatch::from_section("privacy", json!({ "shareEmail": true })).is_err());
    }

    #[test]
    fn daily_goal_is_bounded() {
        for goal in [0u64, 1441, u32::MAX as u64] {
            let err = SettingsPatch::from_section("learning", json!({ "dailyGoal": goal }))
                .unwrap_err();
            assert!(matches!(err, SettingsError::InvalidBody { .. }));
        }
        assert!(SettingsPatch::from_section("learning", json!({ "dailyGoal": 1440 })).is_ok());
    }
}
