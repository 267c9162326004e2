//! services/api/src/operations/notifications.rs
//!
//! The per-account notification inbox. Mentors and students share it; each
//! caller only ever sees and marks their own notifications.

use crate::error::{ServiceError, ServiceResult};
use mentorsphere_core::analytics::order_notifications;
use mentorsphere_core::domain::Notification;
use mentorsphere_core::{Lookup, PortError, Query, Repositories};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkedRead {
    pub updated: u32,
}

/// Unread first, then newest first.
pub async fn inbox(repos: &Repositories, user_id: &str) -> ServiceResult<Vec<Notification>> {
    let query = Query::new().filter("userId", user_id);
    Ok(order_notifications(repos.notifications.find_by(&query).await?))
}

/// Marks one notification read. Marking an already read one succeeds unchanged.
pub async fn mark_read(
    repos: &Repositories,
    user_id: &str,
    notification_id: &str,
) -> ServiceResult<Notification> {
    let not_found = || ServiceError::NotFound("Notification not found".to_string());

    let existing = match repos
        .notifications
        .find_by_id(notification_id, Lookup::Strict)
        .await
    {
        Ok(n) if n.user_id == user_id => n,
        Ok(_) | Err(PortError::NotFound(_)) => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };
    if existing.read {
        return Ok(existing);
    }

    repos
        .notifications
        .modify(notification_id, |n: &mut Notification| {
            n.read = true;
            Ok(())
        })
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => not_found(),
            other => other.into(),
        })
}

/// Marks every unread notification of the caller, returning how many changed.
pub async fn mark_all_read(repos: &Repositories, user_id: &str) -> ServiceResult<MarkedRead> {
    let query = Query::new().filter("userId", user_id).filter("read", false);
    let unread = repos.notifications.find_by(&query).await?;

    let mut updated = 0;
    for notification in unread {
        repos
            .notifications
            .modify(&notification.id, |n: &mut Notification| {
                n.read = true;
                Ok(())
            })
            .await?;
        updated += 1;
    }
    Ok(MarkedRead { updated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::seeded_store;
    use crate::operations::mentor::{create_intervention, CreateInterventionRequest};
    use chrono::Utc;
    use mentorsphere_core::domain::InterventionKind;
    use mentorsphere_core::TieredStore;
    use std::sync::Arc;

    fn repos() -> Repositories {
        let store = seeded_store(Utc::now()).unwrap();
        Repositories::new(Arc::new(TieredStore::local_only(Arc::new(store))))
    }

    #[tokio::test]
    async fn marking_read_is_idempotent() {
        let repos = repos();
        let first = mark_read(&repos, "4", "1").await.unwrap();
        let second = mark_read(&repos, "4", "1").await.unwrap();
        assert!(first.read);
        assert!(second.read);

        let foreign = mark_read(&repos, "5", "2").await;
        assert!(matches!(foreign, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn mark_all_counts_only_unread() {
        let repos = repos();
        assert_eq!(mark_all_read(&repos, "4").await.unwrap().updated, 2);
        assert_eq!(mark_all_read(&repos, "4").await.unwrap().updated, 0);
        assert!(inbox(&repos, "4").await.unwrap().iter().all(|n| n.read));
    }

    #[tokio::test]
    async fn students_read_intervention_notices() {
        let repos = repos();
        create_intervention(
            &repos,
            "4",
            CreateInterventionRequest {
                student_id: "3".to_string(),
                kind: InterventionKind::Reminder,
                message: "Let's plan this week".to_string(),
                scheduled_date: None,
                attachments: vec![],
            },
        )
        .await
        .unwrap();

        let unread = inbox(&repos, "3").await.unwrap();
        assert_eq!(unread.len(), 1);
        assert!(!unread[0].read);

        let read = mark_read(&repos, "3", &unread[0].id).await.unwrap();
        assert!(read.read);
        assert_eq!(mark_all_read(&repos, "3").await.unwrap().updated, 0);

        // A mentor cannot mark the student's notice.
        assert!(matches!(
            mark_read(&repos, "4", &unread[0].id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
