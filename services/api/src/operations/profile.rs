//! services/api/src/operations/profile.rs
//!
//! The caller's own account: profile, avatar, settings, password and deletion.

use crate::credentials::{hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::operations::{activities_of, load_account, require_password, settings_of};
use chrono::Utc;
use mentorsphere_core::analytics::{earned_badges, enrolled_courses, recent_activity, user_stats};
use mentorsphere_core::domain::{Account, AccountCredentials, UserSettings};
use mentorsphere_core::repository::Entity;
use mentorsphere_core::views::Profile;
use mentorsphere_core::{Lookup, PortError, Repositories, SettingsPatch};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use utoipa::ToSchema;

const PROFILE_RECENT_ACTIVITY: usize = 5;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub university: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvatarRequest {
    pub avatar_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeletionOutcome {
    /// The account was removed from the remote store.
    Deleted,
    /// The password checked out but nothing was removed.
    Retained,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountDeletion {
    pub outcome: DeletionOutcome,
    pub message: String,
}

/// Maps a missing account during a write to the same error reads use.
fn user_write_error(e: PortError) -> ServiceError {
    match e {
        PortError::NotFound(_) => ServiceError::NotFound("User not found".to_string()),
        other => other.into(),
    }
}

fn overwrite_if_present(target: &mut String, value: &Option<String>) {
    if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        *target = v.to_string();
    }
}

//=========================================================================================
// Profile
//=========================================================================================

pub async fn get_profile(repos: &Repositories, user_id: &str) -> ServiceResult<Profile> {
    let account = load_account(repos, user_id).await?.account;
    let catalog = repos.courses.find_all().await?;
    let courses = enrolled_courses(&account, &catalog);
    let logs = activities_of(repos, user_id).await?;
    let now = Utc::now();

    let badges = earned_badges(&account, &logs, now);
    let stats = user_stats(&account, &courses, &logs, &badges, now);
    Ok(Profile {
        account,
        stats,
        badges,
        recent_activity: recent_activity(logs, PROFILE_RECENT_ACTIVITY),
    })
}

/// Overwrites only the fields given with a non-empty value.
pub async fn update_profile(
    repos: &Repositories,
    user_id: &str,
    req: UpdateProfileRequest,
) -> ServiceResult<Account> {
    let updated = repos
        .users
        .modify(user_id, move |creds: &mut AccountCredentials| {
            let account = &mut creds.account;
            overwrite_if_present(&mut account.name, &req.name);
            overwrite_if_present(&mut account.bio, &req.bio);
            overwrite_if_present(&mut account.location, &req.location);
            overwrite_if_present(&mut account.phone, &req.phone);
            overwrite_if_present(&mut account.university, &req.university);
            Ok(())
        })
        .await
        .map_err(user_write_error)?;
    Ok(updated.account)
}

pub async fn update_avatar(
    repos: &Repositories,
    user_id: &str,
    req: UpdateAvatarRequest,
) -> ServiceResult<Account> {
    let avatar = req.avatar_url.trim().to_string();
    if avatar.is_empty() {
        return Err(ServiceError::BadRequest("avatarUrl is required".to_string()));
    }
    let updated = repos
        .users
        .modify(user_id, move |creds: &mut AccountCredentials| {
            creds.account.avatar = avatar.clone();
            Ok(())
        })
        .await
        .map_err(user_write_error)?;
    Ok(updated.account)
}

//=========================================================================================
// Settings
//=========================================================================================

/// Returns the caller's settings, storing the defaults on first access.
pub async fn get_settings(repos: &Repositories, user_id: &str) -> ServiceResult<UserSettings> {
    match repos.settings.find_by_id(user_id, Lookup::Strict).await {
        Ok(settings) => Ok(settings),
        Err(PortError::NotFound(_)) => {
            let defaults = UserSettings::defaults_for(user_id);
            repos.settings.put(&defaults).await?;
            Ok(defaults)
        }
        Err(e) => Err(e.into()),
    }
}

/// Applies a partial update to one named section.
pub async fn update_settings(
    repos: &Repositories,
    user_id: &str,
    section: &str,
    body: Value,
) -> ServiceResult<UserSettings> {
    let patch = SettingsPatch::from_section(section, body)?;

    // Make sure there is a record to patch.
    get_settings(repos, user_id).await?;

    let updated = repos
        .settings
        .modify(user_id, move |settings: &mut UserSettings| {
            patch.apply(settings);
            Ok(())
        })
        .await?;
    Ok(updated)
}

//=========================================================================================
// Credentials
//=========================================================================================

pub async fn change_password(
    repos: &Repositories,
    user_id: &str,
    req: ChangePasswordRequest,
) -> ServiceResult<()> {
    let creds = load_account(repos, user_id).await?;
    if !verify_password(&req.current_password, &creds.password_hash) {
        return Err(ServiceError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }
    require_password(&req.new_password)?;

    let digest = hash_password(&req.new_password)?;
    repos
        .users
        .modify(user_id, move |creds: &mut AccountCredentials| {
            creds.password_hash = digest.clone();
            Ok(())
        })
        .await
        .map_err(user_write_error)?;
    info!(user_id, "Password changed");
    Ok(())
}

/// Deletes the account from the remote store. The in-memory dataset never
/// loses accounts, so in fallback mode this only verifies the password.
pub async fn delete_account(
    repos: &Repositories,
    user_id: &str,
    req: DeleteAccountRequest,
) -> ServiceResult<AccountDeletion> {
    let creds = load_account(repos, user_id).await?;
    if !verify_password(&req.password, &creds.password_hash) {
        return Err(ServiceError::BadRequest("Password is incorrect".to_string()));
    }

    let Some(remote) = repos.store.available_remote().await else {
        warn!(user_id, "Account deletion requested while running on the in-memory dataset");
        return Ok(AccountDeletion {
            outcome: DeletionOutcome::Retained,
            message: "Account deletion is not supported in fallback mode".to_string(),
        });
    };

    remote
        .delete(AccountCredentials::COLLECTION, AccountCredentials::KEY_FIELD, user_id)
        .await
        .map_err(user_write_error)?;
    // The settings record may never have been written remotely.
    match remote
        .delete(UserSettings::COLLECTION, UserSettings::KEY_FIELD, user_id)
        .await
    {
        Ok(()) | Err(PortError::NotFound(_)) => {}
        Err(e) => warn!(user_id, error = %e, "Could not remove settings of a deleted account"),
    }

    info!(user_id, "Account deleted");
    Ok(AccountDeletion {
        outcome: DeletionOutcome::Deleted,
        message: "Account deleted".to_string(),
    })
}

/// Exposed for the student and mentor views, which show the learning goal.
pub async fn daily_goal(repos: &Repositories, user_id: &str) -> ServiceResult<u32> {
    Ok(settings_of(repos, user_id).await?.learning.daily_goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::seeded_store;
    use mentorsphere_core::TieredStore;
    use serde_json::json;
    use std::sync::Arc;

    fn repos() -> Repositories {
        let store = seeded_store(Utc::now()).unwrap();
        Repositories::new(Arc::new(TieredStore::local_only(Arc::new(store))))
    }

    #[tokio::test]
    async fn profile_update_ignores_blank_fields() {
        let repos = repos();
        let updated = update_profile(
            &repos,
            "1",
            UpdateProfileRequest {
                bio: Some("Learning ML".to_string()),
                name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.bio, "Learning ML");
        assert_eq!(updated.name, "Budi Santoso");
    }

    #[tokio::test]
    async fn profile_includes_stats() {
        let profile = get_profile(&repos(), "1").await.unwrap();
        assert_eq!(profile.stats.total_study_time, 1240);
        assert_eq!(profile.stats.courses_enrolled, 3);
        assert_eq!(profile.recent_activity.len(), 5);
    }

    #[tokio::test]
    async fn settings_section_patch() {
        let repos = repos();
        let updated = update_settings(&repos, "2", "appearance", json!({ "theme": "dark" }))
            .await
            .unwrap();
        assert_eq!(updated.appearance.theme, "dark");
        assert_eq!(updated.appearance.language, "id");

        let unknown = update_settings(&repos, "2", "billing", json!({})).await;
        assert!(matches!(unknown, Err(ServiceError::BadRequest(_))));
    }

    #[tokio::test]
    async fn password_change_requires_current_password() {
        let repos = repos();
        let wrong = change_password(
            &repos,
            "1",
            ChangePasswordRequest {
                current_password: "nope".to_string(),
                new_password: "another1".to_string(),
            },
        )
        .await;
        assert!(matches!(wrong, Err(ServiceError::BadRequest(_))));

        change_password(
            &repos,
            "1",
            ChangePasswordRequest {
                current_password: "password123".to_string(),
                new_password: "another1".to_string(),
            },
        )
        .await
        .unwrap();
        let creds = load_account(&repos, "1").await.unwrap();
        assert!(verify_password("another1", &creds.password_hash));
    }

    #[tokio::test]
    async fn deletion_in_fallback_mode_is_retained() {
        let repos = repos();
        let wrong = delete_account(&repos, "1", DeleteAccountRequest { password: "x".into() }).await;
        assert!(matches!(wrong, Err(ServiceError::BadRequest(_))));

        let outcome = delete_account(
            &repos,
            "1",
            DeleteAccountRequest {
                password: "password123".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome.outcome, DeletionOutcome::Retained);
        assert!(load_account(&repos, "1").await.is_ok());
    }

    #[tokio::test]
    async fn out_of_range_daily_goal_is_rejected() {
        let repos = repos();
        let err = update_settings(&repos, "1", "learning", json!({ "dailyGoal": 4294967295u64 }))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        assert_eq!(daily_goal(&repos, "1").await.unwrap(), 60);
        assert!(crate::operations::student::dashboard(&repos, "1").await.is_ok());
    }
}
