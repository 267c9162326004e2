//! services/api/src/operations/courses.rs
//!
//! Course catalogue reads and module progress updates.

use crate::error::{ServiceError, ServiceResult};
use crate::operations::load_account;
use mentorsphere_core::analytics::{enrolled_courses, quiz_summary as summarize_quizzes};
use mentorsphere_core::domain::{Course, Module, ModuleStatus};
use mentorsphere_core::views::QuizSummary;
use mentorsphere_core::{Lookup, PortError, Repositories};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateModuleRequest {
    pub status: ModuleStatus,
    /// Left unchanged when absent.
    #[serde(default)]
    pub score: Option<u8>,
}

fn course_not_found(e: PortError) -> ServiceError {
    match e {
        PortError::Rejected(_) => ServiceError::NotFound("Module not found".to_string()),
        PortError::NotFound(_) => ServiceError::NotFound("Course not found".to_string()),
        other => other.into(),
    }
}

pub async fn list_courses(repos: &Repositories) -> ServiceResult<Vec<Course>> {
    Ok(repos.courses.find_all().await?)
}

pub async fn get_course(repos: &Repositories, course_id: &str) -> ServiceResult<Course> {
    repos
        .courses
        .find_by_id(course_id, Lookup::Strict)
        .await
        .map_err(course_not_found)
}

pub async fn course_modules(repos: &Repositories, course_id: &str) -> ServiceResult<Vec<Module>> {
    Ok(get_course(repos, course_id).await?.modules)
}

/// Sets one module's status (and score, when given) as a single
/// read-modify-write of the whole course record.
pub async fn update_module_status(
    repos: &Repositories,
    course_id: &str,
    module_id: u32,
    req: UpdateModuleRequest,
) -> ServiceResult<Course> {
    if req.score.is_some_and(|s| s > 100) {
        return Err(ServiceError::BadRequest(
            "Score must be between 0 and 100".to_string(),
        ));
    }

    let course = repos
        .courses
        .modify(course_id, move |course: &mut Course| {
            let module = course
                .modules
                .iter_mut()
                .find(|m| m.id == module_id)
                .ok_or_else(|| PortError::Rejected(format!("module {}", module_id)))?;
            module.status = req.status;
            if let Some(score) = req.score {
                module.score = Some(score);
            }
            Ok(())
        })
        .await
        .map_err(course_not_found)?;

    info!(course_id, module_id, status = ?req.status, "Module status updated");
    Ok(course)
}

pub async fn quiz_summary(repos: &Repositories, course_id: &str) -> ServiceResult<QuizSummary> {
    let course = get_course(repos, course_id).await?;
    Ok(summarize_quizzes(&course))
}

/// The courses the account is enrolled in, in catalogue order.
pub async fn student_courses(repos: &Repositories, user_id: &str) -> ServiceResult<Vec<Course>> {
    let account = load_account(repos, user_id).await?.account;
    let catalog = repos.courses.find_all().await?;
    Ok(enrolled_courses(&account, &catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{seeded_store, MemoryStore};
    use chrono::Utc;
    use mentorsphere_core::{DocumentStore, TieredStore};
    use serde_json::json;
    use std::sync::Arc;

    fn repos() -> Repositories {
        let store = seeded_store(Utc::now()).unwrap();
        Repositories::new(Arc::new(TieredStore::local_only(Arc::new(store))))
    }

    #[tokio::test]
    async fn module_update_touches_one_module() {
        let repos = repos();
        let before = get_course(&repos, "1").await.unwrap();

        let after = update_module_status(
            &repos,
            "1",
            5,
            UpdateModuleRequest {
                status: ModuleStatus::Completed,
                score: Some(92),
            },
        )
        .await
        .unwrap();

        let module = after.module(5).unwrap();
        assert_eq!(module.status, ModuleStatus::Completed);
        assert_eq!(module.score, Some(92));
        for (old, new) in before.modules.iter().zip(after.modules.iter()) {
            if old.id != 5 {
                assert_eq!(old, new);
            }
        }
        assert_eq!(get_course(&repos, "1").await.unwrap(), after);
    }

    #[tokio::test]
    async fn score_is_kept_when_not_given() {
        let repos = repos();
        let course = update_module_status(
            &repos,
            "1",
            4,
            UpdateModuleRequest {
                status: ModuleStatus::InProgress,
                score: None,
            },
        )
        .await
        .unwrap();
        let quiz = course.module(4).unwrap();
        assert_eq!(quiz.status, ModuleStatus::InProgress);
        assert_eq!(quiz.score, Some(85));
    }

    #[tokio::test]
    async fn missing_course_or_module() {
        let repos = repos();
        let req = UpdateModuleRequest {
            status: ModuleStatus::Completed,
            score: None,
        };
        assert_eq!(
            update_module_status(&repos, "9", 1, req.clone()).await.unwrap_err(),
            ServiceError::NotFound("Course not found".to_string())
        );
        assert_eq!(
            update_module_status(&repos, "1", 99, req).await.unwrap_err(),
            ServiceError::NotFound("Module not found".to_string())
        );
    }

    #[tokio::test]
    async fn quiz_summary_of_seeded_course() {
        let summary = quiz_summary(&repos(), "1").await.unwrap();
        assert_eq!(summary.total_quizzes, 1);
        assert_eq!(summary.completed_quizzes, 1);
        assert_eq!(summary.average_score, 85.0);
    }

    #[tokio::test]
    async fn missing_module_on_the_remote_course_is_not_retried_locally() {
        let remote_course = json!({
            "id": "1",
            "title": "Remote",
            "modules": [
                { "id": 1, "title": "Intro", "duration": 10, "type": "video", "status": "locked" }
            ]
        });
        let remote: Arc<dyn DocumentStore> =
            Arc::new(MemoryStore::with_documents(vec![("courses", vec![remote_course])]));
        let local = Arc::new(seeded_store(Utc::now()).unwrap());
        let repos = Repositories::new(Arc::new(TieredStore::new(Some(remote), local.clone())));

        let err = update_module_status(
            &repos,
            "1",
            5,
            UpdateModuleRequest {
                status: ModuleStatus::Completed,
                score: Some(92),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err, ServiceError::NotFound("Module not found".to_string()));

        let served = get_course(&repos, "1").await.unwrap();
        assert_eq!(served.title, "Remote");
        assert!(served.module(5).is_none());

        // The in-memory copy was left alone.
        let local_only = Repositories::new(Arc::new(TieredStore::local_only(local)));
        let untouched = get_course(&local_only, "1").await.unwrap();
        assert_eq!(untouched.module(5).unwrap().status, ModuleStatus::InProgress);
    }
}
