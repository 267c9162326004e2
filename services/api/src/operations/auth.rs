//! services/api/src/operations/auth.rs
//!
//! Login, registration and the current-user lookup.

use crate::credentials::{hash_password, verify_password, TokenIssuer};
use crate::error::{ServiceError, ServiceResult};
use crate::operations::{load_account, require_password};
use chrono::Utc;
use mentorsphere_core::domain::{Account, AccountCredentials, Role, UserSettings};
use mentorsphere_core::{Lookup, PortError, Repositories};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{info, warn};
use utoipa::ToSchema;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const INVALID_CREDENTIALS: &str = "Invalid email or password";
const EMAIL_TAKEN: &str = "Email is already registered";
/// Risk score assigned before any activity exists.
const INITIAL_RISK_SCORE: u8 = 50;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `student`.
    #[serde(default)]
    pub role: Option<Role>,
}

/// An account together with a freshly issued session token.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthSession {
    pub user: Account,
    pub token: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

//=========================================================================================
// Operations
//=========================================================================================

pub async fn login(
    repos: &Repositories,
    tokens: &TokenIssuer,
    req: LoginRequest,
) -> ServiceResult<AuthSession> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(ServiceError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let credentials = repos
        .users
        .find_one_by("email", email.as_str(), Lookup::Exhaustive)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&req.password, &credentials.password_hash) {
        warn!(user_id = %credentials.account.id, "Rejected login with a wrong password");
        return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = tokens.issue(&credentials.account)?;
    info!(user_id = %credentials.account.id, "User logged in");
    Ok(AuthSession {
        user: credentials.account,
        token,
    })
}

pub async fn register(
    repos: &Repositories,
    tokens: &TokenIssuer,
    req: RegisterRequest,
) -> ServiceResult<AuthSession> {
    let name = req.name.trim().to_string();
    let email = normalize_email(&req.email);
    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ServiceError::BadRequest(
            "Name, email, and password are required".to_string(),
        ));
    }
    if !is_valid_email(&email) {
        return Err(ServiceError::BadRequest("Email address is not valid".to_string()));
    }
    require_password(&req.password)?;

    // Either tier may already hold the address.
    if repos
        .users
        .find_one_by("email", email.as_str(), Lookup::Exhaustive)
        .await?
        .is_some()
    {
        return Err(ServiceError::BadRequest(EMAIL_TAKEN.to_string()));
    }

    let role = req.role.unwrap_or(Role::Student);
    let candidate = AccountCredentials {
        account: Account {
            id: String::new(),
            name: name.clone(),
            email,
            role,
            avatar: format!(
                "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
                name.replace(' ', "")
            ),
            bio: String::new(),
            location: String::new(),
            phone: String::new(),
            university: String::new(),
            joined_date: Utc::now(),
            enrolled_courses: Vec::new(),
            assigned_students: Vec::new(),
            total_study_time: 0,
            completed_modules: 0,
            risk_score: INITIAL_RISK_SCORE,
        },
        password_hash: hash_password(&req.password)?,
    };

    let created = match repos.users.create_unique(candidate, "email").await {
        Ok(created) => created,
        Err(PortError::Conflict(_)) => return Err(ServiceError::BadRequest(EMAIL_TAKEN.to_string())),
        Err(e) => return Err(e.into()),
    };

    repos
        .settings
        .put(&UserSettings::defaults_for(&created.account.id))
        .await?;

    let token = tokens.issue(&created.account)?;
    info!(user_id = %created.account.id, role = %role, "Registered a new account");
    Ok(AuthSession {
        user: created.account,
        token,
    })
}

pub async fn current_user(repos: &Repositories, user_id: &str) -> ServiceResult<Account> {
    Ok(load_account(repos, user_id).await?.account)
}
