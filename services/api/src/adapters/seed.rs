//! services/api/src/adapters/seed.rs
//!
//! The dataset the in-memory store starts with: five accounts, three courses,
//! a week of activity for the first student, and some mentoring history.
//! Every seeded account signs in with `password123`.

use crate::adapters::memory::MemoryStore;
use crate::credentials::hash_password;
use crate::error::ServiceError;
use chrono::{DateTime, Duration, Months, Utc};
use mentorsphere_core::domain::{
    Account, AccountCredentials, ActivityKind, ActivityLog, Course, Intervention,
    InterventionKind, InterventionStatus, Module, ModuleKind, ModuleStatus, Notification,
    NotificationKind, Role, UserSettings,
};
use mentorsphere_core::ports::Document;
use mentorsphere_core::repository::Entity;
use serde::Serialize;

pub const SEED_PASSWORD: &str = "password123";

fn avatar(seed: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", seed)
}

fn ids(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn months_ago(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months)).unwrap_or(now)
}

struct SeedAccount<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    role: Role,
    avatar_seed: &'a str,
    enrolled: &'a [&'a str],
    assigned: &'a [&'a str],
    study_time: u32,
    completed_modules: u32,
    risk_score: u8,
    joined_months_ago: u32,
}

fn account(seed: SeedAccount<'_>, password_hash: &str, now: DateTime<Utc>) -> AccountCredentials {
    AccountCredentials {
        account: Account {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            email: seed.email.to_string(),
            role: seed.role,
            avatar: avatar(seed.avatar_seed),
            bio: String::new(),
            location: String::new(),
            phone: String::new(),
            university: String::new(),
            joined_date: months_ago(now, seed.joined_months_ago),
            enrolled_courses: ids(seed.enrolled),
            assigned_students: ids(seed.assigned),
            total_study_time: seed.study_time,
            completed_modules: seed.completed_modules,
            risk_score: seed.risk_score,
        },
        password_hash: password_hash.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn student(
    id: &'static str,
    name: &'static str,
    email: &'static str,
    avatar_seed: &'static str,
    enrolled: &'static [&'static str],
    study_time: u32,
    completed_modules: u32,
    risk_score: u8,
    joined_months_ago: u32,
) -> SeedAccount<'static> {
    SeedAccount {
        id,
        name,
        email,
        role: Role::Student,
        avatar_seed,
        enrolled,
        assigned: &[],
        study_time,
        completed_modules,
        risk_score,
        joined_months_ago,
    }
}

fn mentor(
    id: &'static str,
    name: &'static str,
    email: &'static str,
    avatar_seed: &'static str,
    assigned: &'static [&'static str],
    joined_months_ago: u32,
) -> SeedAccount<'static> {
    SeedAccount {
        id,
        name,
        email,
        role: Role::Mentor,
        avatar_seed,
        enrolled: &[],
        assigned,
        study_time: 0,
        completed_modules: 0,
        risk_score: 0,
        joined_months_ago,
    }
}

fn accounts(password_hash: &str, now: DateTime<Utc>) -> Vec<AccountCredentials> {
    vec![
        student("1", "Budi Santoso", "budi@student.com", "Budi", &["1", "2", "3"], 1240, 15, 25, 6),
        student("2", "Siti Rahayu", "siti@student.com", "Siti", &["1", "2"], 890, 10, 45, 4),
        student("3", "Ahmad Wijaya", "ahmad@student.com", "Ahmad", &["2", "3"], 450, 5, 72, 2),
        mentor("4", "Dr. Hendra Kusuma", "hendra@mentor.com", "Hendra", &["1", "2", "3"], 12),
        mentor("5", "Prof. Maria Tan", "maria@mentor.com", "Maria", &["1", "2"], 24),
    ]
    .into_iter()
    .map(|seed| account(seed, password_hash, now))
    .collect()
}

fn module(id: u32, title: &str, duration: u32, kind: ModuleKind, status: ModuleStatus, score: Option<u8>) -> Module {
    Module {
        id,
        title: title.to_string(),
        duration,
        kind,
        status,
        score,
    }
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: &str,
    title: &str,
    description: &str,
    instructor: &str,
    thumbnail: &str,
    duration: &str,
    counts: (u32, u32, u8),
    category: &str,
    level: &str,
    modules: Vec<Module>,
) -> Course {
    let (total_modules, completed_modules, progress) = counts;
    Course {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        instructor: instructor.to_string(),
        thumbnail: thumbnail.to_string(),
        duration: duration.to_string(),
        total_modules,
        completed_modules,
        progress,
        category: category.to_string(),
        level: level.to_string(),
        modules,
    }
}

fn courses() -> Vec<Course> {
    use ModuleKind::{Quiz, Reading, Video};
    use ModuleStatus::{Completed, InProgress, Locked};

    vec![
        course(
            "1",
            "Machine Learning Fundamentals",
            "Learn machine learning from the core concepts through to practical implementation in Python.",
            "Dr. Hendra Kusuma",
            "https://images.unsplash.com/photo-1555949963-aa79dcee981c?w=400",
            "12 weeks",
            (24, 18, 75),
            "Data Science",
            "Beginner",
            vec![
                module(1, "Introduction to Machine Learning", 45, Video, Completed, None),
                module(2, "Supervised vs Unsupervised Learning", 60, Video, Completed, None),
                module(3, "Linear Regression", 90, Reading, Completed, None),
                module(4, "Quiz: Core Concepts", 30, Quiz, Completed, Some(85)),
                module(5, "Decision Trees", 75, Video, InProgress, None),
                module(6, "Random Forest", 60, Video, Locked, None),
            ],
        ),
        course(
            "2",
            "Web Development with React",
            "Master React.js to build modern, interactive and responsive web applications.",
            "Prof. Maria Tan",
            "https://images.unsplash.com/photo-1633356122544-f134324a6cee?w=400",
            "10 weeks",
            (20, 8, 40),
            "Web Development",
            "Intermediate",
            vec![
                module(1, "Introduction to React", 45, Video, Completed, None),
                module(2, "JSX and Components", 60, Video, Completed, None),
                module(3, "State and Props", 90, Reading, Completed, None),
                module(4, "Quiz: React Basics", 30, Quiz, Completed, Some(92)),
                module(5, "Hooks: useState & useEffect", 75, Video, InProgress, None),
            ],
        ),
        course(
            "3",
            "Data Analysis with Python",
            "Learn data analysis techniques with Python, Pandas and data visualisation.",
            "Dr. Hendra Kusuma",
            "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=400",
            "8 weeks",
            (16, 4, 25),
            "Data Science",
            "Beginner",
            vec![
                module(1, "Python for Data", 60, Video, Completed, None),
                module(2, "NumPy Fundamentals", 75, Video, Completed, None),
                module(3, "Pandas DataFrame", 90, Reading, InProgress, None),
                module(4, "Data Visualization", 60, Video, Locked, None),
            ],
        ),
    ]
}

fn activities(now: DateTime<Utc>) -> Vec<ActivityLog> {
    use ActivityKind::{Quiz, Reading, Video};

    [
        ("1", Video, "Watched: Decision Trees", 45, 24, "1", None),
        ("2", Reading, "Read: Linear Regression Notes", 30, 23, "1", None),
        ("3", Quiz, "Quiz: Machine Learning Basics", 25, 48, "1", Some(85)),
        ("4", Video, "Watched: Hooks useState", 60, 72, "2", None),
        ("5", Reading, "Read: React Documentation", 45, 96, "2", None),
        ("6", Video, "Watched: Pandas DataFrame", 55, 120, "3", None),
        ("7", Quiz, "Quiz: React Basics", 20, 144, "2", Some(92)),
    ]
    .into_iter()
    .map(|(id, kind, title, duration, hours_ago, course_id, score)| ActivityLog {
        id: id.to_string(),
        user_id: "1".to_string(),
        kind,
        title: title.to_string(),
        duration,
        date: now - Duration::hours(hours_ago),
        course_id: course_id.to_string(),
        score,
    })
    .collect()
}

fn interventions(now: DateTime<Utc>) -> Vec<Intervention> {
    vec![
        Intervention {
            id: "1".to_string(),
            student_id: "3".to_string(),
            student_name: "Ahmad Wijaya".to_string(),
            mentor_id: "4".to_string(),
            kind: InterventionKind::Reminder,
            message: "Ahmad, I noticed your study activity dropped this week. Is there anything I can help with?".to_string(),
            status: InterventionStatus::Sent,
            created_at: now - Duration::hours(24),
            response: None,
            scheduled_date: None,
            attachments: vec![],
        },
        Intervention {
            id: "2".to_string(),
            student_id: "2".to_string(),
            student_name: "Siti Rahayu".to_string(),
            mentor_id: "4".to_string(),
            kind: InterventionKind::Meeting,
            message: "Let's schedule a consultation to go over your progress in the Machine Learning modules.".to_string(),
            status: InterventionStatus::Scheduled,
            created_at: now - Duration::hours(48),
            response: None,
            scheduled_date: Some(now + Duration::hours(24)),
            attachments: vec![],
        },
        Intervention {
            id: "3".to_string(),
            student_id: "1".to_string(),
            student_name: "Budi Santoso".to_string(),
            mentor_id: "4".to_string(),
            kind: InterventionKind::Resource,
            message: "Here is some extra material to help with Decision Trees.".to_string(),
            status: InterventionStatus::Sent,
            created_at: now - Duration::hours(72),
            response: None,
            scheduled_date: None,
            attachments: vec!["decision_trees_guide.pdf".to_string()],
        },
    ]
}

fn notifications(now: DateTime<Utc>) -> Vec<Notification> {
    use NotificationKind::{Danger, Info, Success, Warning};

    [
        ("1", Danger, "Danger Zone", "Ahmad Wijaya has been inactive for 5 days", "2 hours ago", 2, false),
        ("2", Warning, "Needs Attention", "Siti Rahayu's performance is declining", "5 hours ago", 5, false),
        ("3", Info, "New Achievement", "Budi Santoso completed a quiz with a score of 85", "1 day ago", 24, true),
        ("4", Success, "Intervention Worked", "Siti Rahayu is active again after a reminder", "2 days ago", 48, true),
    ]
    .into_iter()
    .map(|(id, kind, title, message, time, hours_ago, read)| Notification {
        id: id.to_string(),
        user_id: "4".to_string(),
        kind,
        title: title.to_string(),
        message: message.to_string(),
        time: time.to_string(),
        created_at: now - Duration::hours(hours_ago),
        read,
    })
    .collect()
}

fn to_documents<T: Serialize>(items: &[T]) -> Result<Vec<Document>, ServiceError> {
    items
        .iter()
        .map(|item| {
            serde_json::to_value(item)
                .map_err(|e| ServiceError::Internal(format!("Failed to encode seed record: {}", e)))
        })
        .collect()
}

/// Builds the in-memory store with the full seed dataset.
pub fn seeded_store(now: DateTime<Utc>) -> Result<MemoryStore, ServiceError> {
    // One digest shared by every seeded account.
    let password_hash = hash_password(SEED_PASSWORD)?;
    let users = accounts(&password_hash, now);
    let settings: Vec<UserSettings> = users
        .iter()
        .map(|u| UserSettings::defaults_for(&u.account.id))
        .collect();

    Ok(MemoryStore::with_documents(vec![
        (AccountCredentials::COLLECTION, to_documents(&users)?),
        (Course::COLLECTION, to_documents(&courses())?),
        (ActivityLog::COLLECTION, to_documents(&activities(now))?),
        (Intervention::COLLECTION, to_documents(&interventions(now))?),
        (Notification::COLLECTION, to_documents(&notifications(now))?),
        (UserSettings::COLLECTION, to_documents(&settings)?),
    ]))
}
