//! services/api/src/operations/mod.rs
//!
//! The domain operations behind every endpoint. Each one takes the already
//! authenticated caller's id, resolves records through the repositories and,
//! where needed, folds them into a view with the pure functions in
//! `mentorsphere_core::analytics`.

pub mod auth;
pub mod courses;
pub mod mentor;
pub mod notifications;
pub mod profile;
pub mod reflection;
pub mod student;

use crate::error::{ServiceError, ServiceResult};
use mentorsphere_core::analytics::StudentSnapshot;
use mentorsphere_core::domain::{AccountCredentials, ActivityLog, Course, UserSettings};
use mentorsphere_core::{Lookup, PortError, Query, Repositories, SortOrder};

/// Minimum length for any new password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Loads the stored account from either tier, the same way login finds it.
/// Absence maps to a client-facing `NotFound`.
pub(crate) async fn load_account(
    repos: &Repositories,
    user_id: &str,
) -> ServiceResult<AccountCredentials> {
    match repos.users.find_by_id(user_id, Lookup::Exhaustive).await {
        Ok(account) => Ok(account),
        Err(PortError::NotFound(_)) => Err(ServiceError::NotFound("User not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Activity logs of one account, newest first.
pub(crate) async fn activities_of(
    repos: &Repositories,
    user_id: &str,
) -> ServiceResult<Vec<ActivityLog>> {
    let query = Query::new()
        .filter("userId", user_id)
        .order_by("date", SortOrder::Descending);
    Ok(repos.activities.find_by(&query).await?)
}

/// The stored settings, or the defaults when the account has none yet.
pub(crate) async fn settings_of(repos: &Repositories, user_id: &str) -> ServiceResult<UserSettings> {
    match repos.settings.find_by_id(user_id, Lookup::Strict).await {
        Ok(settings) => Ok(settings),
        Err(PortError::NotFound(_)) => Ok(UserSettings::defaults_for(user_id)),
        Err(e) => Err(e.into()),
    }
}

/// Everything the analytics need to know about one student.
pub(crate) async fn snapshot(
    repos: &Repositories,
    credentials: AccountCredentials,
    catalog: &[Course],
) -> ServiceResult<StudentSnapshot> {
    let account = credentials.account;
    let courses = mentorsphere_core::analytics::enrolled_courses(&account, catalog);
    let activities = activities_of(repos, &account.id).await?;
    Ok(StudentSnapshot {
        account,
        courses,
        activities,
    })
}

pub(crate) fn require_password(password: &str) -> ServiceResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
