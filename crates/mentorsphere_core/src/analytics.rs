//! crates/mentorsphere_core/src/analytics.rs
//!
//! Pure aggregation over raw records: weekly bucketing, risk scoring,
//! quiz and progress summaries, and the building blocks of both dashboards.
//! Every function takes `now` explicitly so results are reproducible.

use crate::domain::{
    Account, ActivityKind, ActivityLog, Course, FactorStatus, Intervention, ModuleKind,
    ModuleStatus, Notification, RiskFactor, RiskLevel,
};
use crate::views::{
    ActivityBreakdown, Badge, Insight, MentorStats, PerformanceMetrics, QuizEntry, QuizSummary,
    RiskDistribution, StudentRiskRow, UserStats, WeeklyActivity,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use std::collections::HashSet;

/// Output labels, Monday first.
pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Scores at or above this are "at risk".
pub const AT_RISK_THRESHOLD: u8 = 50;

/// A quiz passes at or above this score.
pub const QUIZ_PASS_SCORE: u8 = 70;

const WINDOW_DAYS: i64 = 7;

//=========================================================================================
// Activity
//=========================================================================================

fn in_last_week(log: &ActivityLog, now: DateTime<Utc>) -> bool {
    log.date > now - Duration::days(WINDOW_DAYS) && log.date <= now
}

/// Buckets the last seven days of activity by weekday.
///
/// Buckets are filled by raw weekday index (Sunday = 0) and emitted Monday
/// first, so output slot `i` holds raw bucket `(i + 1) % 7`.
pub fn weekly_activity(logs: &[ActivityLog], now: DateTime<Utc>) -> Vec<WeeklyActivity> {
    let mut minutes = [0u32; 7];
    let mut counts = [0u32; 7];

    for log in logs.iter().filter(|log| in_last_week(log, now)) {
        let day = log.date.weekday().num_days_from_sunday() as usize;
        minutes[day] += log.duration;
        counts[day] += 1;
    }

    DAY_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let raw = (i + 1) % 7;
            WeeklyActivity {
                day: label.to_string(),
                study_time: minutes[raw],
                activities: counts[raw],
            }
        })
        .collect()
}

/// Minutes per activity kind.
pub fn activity_breakdown(logs: &[ActivityLog]) -> ActivityBreakdown {
    logs.iter()
        .fold(ActivityBreakdown::default(), |mut acc, log| {
            match log.kind {
                ActivityKind::Video => acc.video += log.duration,
                ActivityKind::Reading => acc.reading += log.duration,
                ActivityKind::Quiz => acc.quiz += log.duration,
            }
            acc
        })
}

/// Newest first, at most `limit` entries.
pub fn recent_activity(mut logs: Vec<ActivityLog>, limit: usize) -> Vec<ActivityLog> {
    logs.sort_by(|a, b| b.date.cmp(&a.date));
    logs.truncate(limit);
    logs
}

fn active_days(logs: &[ActivityLog]) -> HashSet<NaiveDate> {
    logs.iter().map(|log| log.date.date_naive()).collect()
}

/// Consecutive active days ending today, or ending yesterday if today is idle.
pub fn study_streak(logs: &[ActivityLog], now: DateTime<Utc>) -> u32 {
    let days = active_days(logs);
    let mut day = now.date_naive();
    if !days.contains(&day) {
        day -= Duration::days(1);
    }
    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// "improving", "stable" or "declining", comparing this week's minutes with last week's.
pub fn activity_trend(logs: &[ActivityLog], now: DateTime<Utc>) -> &'static str {
    let week_ago = now - Duration::days(WINDOW_DAYS);
    let two_weeks_ago = week_ago - Duration::days(WINDOW_DAYS);

    let (current, previous) = logs.iter().fold((0u32, 0u32), |(cur, prev), log| {
        if log.date > week_ago && log.date <= now {
            (cur + log.duration, prev)
        } else if log.date > two_weeks_ago && log.date <= week_ago {
            (cur, prev + log.duration)
        } else {
            (cur, prev)
        }
    });

    match current.cmp(&previous) {
        std::cmp::Ordering::Greater => "improving",
        std::cmp::Ordering::Equal => "stable",
        std::cmp::Ordering::Less => "declining",
    }
}

//=========================================================================================
// Risk
//=========================================================================================

pub fn risk_level(score: u8) -> RiskLevel {
    match score {
        0..=29 => RiskLevel::Low,
        30..=49 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

pub fn is_at_risk(score: u8) -> bool {
    score >= AT_RISK_THRESHOLD
}

pub fn factor_status(value: u8) -> FactorStatus {
    match value {
        85..=u8::MAX => FactorStatus::Excellent,
        70..=84 => FactorStatus::Good,
        _ => FactorStatus::Moderate,
    }
}

fn percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part.saturating_mul(100) / whole).min(100) as u8
}

/// Completed and total module counts, preferring the module list when present.
pub fn course_completion(course: &Course) -> (u32, u32) {
    if course.modules.is_empty() {
        return (course.completed_modules, course.total_modules);
    }
    let completed = course
        .modules
        .iter()
        .filter(|m| m.status == ModuleStatus::Completed)
        .count() as u32;
    (completed, course.modules.len() as u32)
}

fn quiz_scores(courses: &[Course]) -> Vec<u8> {
    courses
        .iter()
        .flat_map(|c| c.modules.iter())
        .filter(|m| m.kind == ModuleKind::Quiz)
        .filter_map(|m| m.score)
        .collect()
}

fn mean(values: &[u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    (values.iter().map(|&v| v as u32).sum::<u32>() / values.len() as u32) as u8
}

fn factor(name: &str, value: u8) -> RiskFactor {
    RiskFactor {
        name: name.to_string(),
        value,
        status: factor_status(value),
    }
}

/// The four 0-100 factors behind a risk assessment.
pub fn risk_factors(
    logs: &[ActivityLog],
    courses: &[Course],
    daily_goal: u32,
    now: DateTime<Utc>,
) -> Vec<RiskFactor> {
    let recent: Vec<ActivityLog> = logs
        .iter()
        .filter(|log| in_last_week(log, now))
        .cloned()
        .collect();

    let consistency = percent(active_days(&recent).len() as u32, WINDOW_DAYS as u32);

    let (completed, total) = courses
        .iter()
        .map(course_completion)
        .fold((0, 0), |(c, t), (dc, dt)| (c + dc, t + dt));
    let completion = percent(completed, total);

    let weekly_minutes = recent
        .iter()
        .fold(0u32, |acc, log| acc.saturating_add(log.duration));
    let engagement = percent(weekly_minutes, daily_goal.saturating_mul(WINDOW_DAYS as u32));

    let quiz = mean(&quiz_scores(courses));

    vec![
        factor("Learning consistency", consistency),
        factor("Task completion", completion),
        factor("Engagement", engagement),
        factor("Quiz performance", quiz),
    ]
}

/// `100 - mean(factors)`; a neutral 50 when there is nothing to score.
pub fn derived_risk_score(factors: &[RiskFactor]) -> u8 {
    if factors.is_empty() {
        return AT_RISK_THRESHOLD;
    }
    let values: Vec<u8> = factors.iter().map(|f| f.value).collect();
    100 - mean(&values)
}

/// Low/Medium/High counts in display order.
pub fn risk_distribution(scores: &[u8]) -> Vec<RiskDistribution> {
    let count = |level: RiskLevel| scores.iter().filter(|&&s| risk_level(s) == level).count() as u32;
    [
        (RiskLevel::Low, "Low", "hsl(var(--success))"),
        (RiskLevel::Medium, "Medium", "hsl(var(--warning))"),
        (RiskLevel::High, "High", "hsl(var(--destructive))"),
    ]
    .into_iter()
    .map(|(level, label, color)| RiskDistribution {
        level: label.to_string(),
        count: count(level),
        color: color.to_string(),
    })
    .collect()
}

pub fn students_at_risk(rows: &[StudentRiskRow]) -> Vec<StudentRiskRow> {
    rows.iter()
        .filter(|row| is_at_risk(row.risk_score))
        .cloned()
        .collect()
}

//=========================================================================================
// Courses
//=========================================================================================

pub fn quiz_passed(score: Option<u8>) -> bool {
    score.is_some_and(|s| s >= QUIZ_PASS_SCORE)
}

pub fn quiz_summary(course: &Course) -> QuizSummary {
    let quizzes: Vec<QuizEntry> = course
        .modules
        .iter()
        .filter(|m| m.kind == ModuleKind::Quiz)
        .map(|m| QuizEntry {
            id: m.id,
            title: m.title.clone(),
            duration: m.duration,
            kind: m.kind,
            status: m.status,
            score: m.score,
            passed: quiz_passed(m.score),
        })
        .collect();

    let scores: Vec<u32> = quizzes.iter().filter_map(|q| q.score.map(u32::from)).collect();
    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<u32>() as f64 / scores.len() as f64
    };

    QuizSummary {
        total_quizzes: quizzes.len() as u32,
        completed_quizzes: quizzes
            .iter()
            .filter(|q| q.status == ModuleStatus::Completed)
            .count() as u32,
        average_score,
        quizzes,
    }
}

/// Mean course progress, truncated.
pub fn average_progress(courses: &[Course]) -> u8 {
    if courses.is_empty() {
        return 0;
    }
    let total: u32 = courses.iter().map(|c| c.progress as u32).sum();
    (total / courses.len() as u32) as u8
}

/// Courses whose id appears in the account's enrollment list, in catalog order.
pub fn enrolled_courses(account: &Account, catalog: &[Course]) -> Vec<Course> {
    catalog
        .iter()
        .filter(|c| account.enrolled_courses.contains(&c.id))
        .cloned()
        .collect()
}

//=========================================================================================
// Mentoring
//=========================================================================================

/// Newest first, at most `limit` entries.
pub fn recent_interventions(mut items: Vec<Intervention>, limit: usize) -> Vec<Intervention> {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    items
}

/// Unread first, then newest first.
pub fn order_notifications(mut items: Vec<Notification>) -> Vec<Notification> {
    items.sort_by(|a, b| a.read.cmp(&b.read).then(b.created_at.cmp(&a.created_at)));
    items
}

/// Everything the mentor views need to know about one assigned student.
#[derive(Debug, Clone)]
pub struct StudentSnapshot {
    pub account: Account,
    pub courses: Vec<Course>,
    pub activities: Vec<ActivityLog>,
}

impl StudentSnapshot {
    pub fn risk_row(&self, now: DateTime<Utc>) -> StudentRiskRow {
        let last_active = self
            .activities
            .iter()
            .map(|log| log.date)
            .max()
            .unwrap_or(self.account.joined_date);

        StudentRiskRow {
            id: self.account.id.clone(),
            name: self.account.name.clone(),
            risk_score: self.account.risk_score,
            last_active: last_active.format("%Y-%m-%d").to_string(),
            progress: average_progress(&self.courses),
            trend: activity_trend(&self.activities, now).to_string(),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.activities.iter().any(|log| in_last_week(log, now))
    }

    pub fn performance(&self, daily_goal: u32, now: DateTime<Utc>) -> PerformanceMetrics {
        let factors = risk_factors(&self.activities, &self.courses, daily_goal, now);
        let value = |i: usize| factors.get(i).map(|f| f.value as f64).unwrap_or(0.0);
        PerformanceMetrics {
            consistency_score: value(0),
            completion_rate: value(1),
            engagement_score: value(2),
            average_quiz_score: value(3),
        }
    }
}

pub fn mentor_stats(
    students: &[StudentSnapshot],
    interventions: &[Intervention],
    now: DateTime<Utc>,
) -> MentorStats {
    if students.is_empty() {
        return MentorStats {
            interventions_this_week: count_recent_interventions(interventions, now),
            ..MentorStats::default()
        };
    }

    let total = students.len() as u32;
    let progress_sum: u32 = students
        .iter()
        .map(|s| average_progress(&s.courses) as u32)
        .sum();
    let (completed, modules) = students
        .iter()
        .flat_map(|s| s.courses.iter().map(course_completion))
        .fold((0u32, 0u32), |(c, t), (dc, dt)| (c + dc, t + dt));

    MentorStats {
        total_students: total,
        active_students: students.iter().filter(|s| s.is_active(now)).count() as u32,
        average_progress: progress_sum as f64 / total as f64,
        students_at_risk: students
            .iter()
            .filter(|s| is_at_risk(s.account.risk_score))
            .count() as u32,
        interventions_this_week: count_recent_interventions(interventions, now),
        completion_rate: if modules == 0 {
            0.0
        } else {
            completed as f64 * 100.0 / modules as f64
        },
    }
}

fn count_recent_interventions(interventions: &[Intervention], now: DateTime<Utc>) -> u32 {
    let week_ago = now - Duration::days(WINDOW_DAYS);
    interventions
        .iter()
        .filter(|i| i.created_at > week_ago)
        .count() as u32
}

//=========================================================================================
// Student-facing summaries
//=========================================================================================

/// A short templated nudge picked by simple thresholds.
pub fn student_insight(average_progress: u8, weekly: &[WeeklyActivity], daily_goal: u32) -> Insight {
    let minutes = weekly
        .iter()
        .fold(0u32, |acc, d| acc.saturating_add(d.study_time));
    let goal = daily_goal.saturating_mul(WINDOW_DAYS as u32);

    let (title, message, kind) = if minutes == 0 {
        (
            "Time to get back on track",
            "No study sessions were logged in the last seven days. A short session today keeps your streak alive.".to_string(),
            "warning",
        )
    } else if goal > 0 && minutes >= goal {
        (
            "Today's insight",
            format!(
                "You studied {} minutes this week and met your weekly goal. Keep the momentum going.",
                minutes
            ),
            "positive",
        )
    } else if average_progress < 30 {
        (
            "Build a routine",
            format!(
                "Your courses are {}% complete on average. Finishing one module a day will move things along quickly.",
                average_progress
            ),
            "neutral",
        )
    } else {
        (
            "Today's insight",
            format!(
                "You studied {} of your {} weekly minutes. A little more time each day will close the gap.",
                minutes, goal
            ),
            "neutral",
        )
    };

    Insight {
        title: title.to_string(),
        message,
        kind: kind.to_string(),
    }
}

fn badge(id: u32, name: &str, icon: &str, description: &str) -> Badge {
    Badge {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
    }
}

/// Badges earned from the account's history.
pub fn earned_badges(account: &Account, logs: &[ActivityLog], now: DateTime<Utc>) -> Vec<Badge> {
    let mut badges = Vec::new();
    if logs.iter().any(|log| log.date.hour() < 6) {
        badges.push(badge(1, "Early Bird", "🌅", "Studied before 6 AM"));
    }
    if study_streak(logs, now) >= 7 {
        badges.push(badge(2, "Consistent Learner", "🔥", "Seven day study streak"));
    }
    if logs
        .iter()
        .any(|log| log.kind == ActivityKind::Quiz && log.score.is_some_and(|s| s >= 90))
    {
        badges.push(badge(3, "Quiz Master", "🏆", "Scored 90 or more on a quiz"));
    }
    if account.completed_modules >= 10 {
        badges.push(badge(4, "Fast Learner", "⚡", "Completed ten modules"));
    }
    badges
}

pub fn user_stats(
    account: &Account,
    courses: &[Course],
    logs: &[ActivityLog],
    badges: &[Badge],
    now: DateTime<Utc>,
) -> UserStats {
    UserStats {
        total_study_time: account.total_study_time,
        modules_completed: account.completed_modules,
        courses_enrolled: account.enrolled_courses.len() as u32,
        certificates: courses.iter().filter(|c| c.progress >= 100).count() as u32,
        badges: badges.len() as u32,
        streak: study_streak(logs, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Module, Role};
    use chrono::TimeZone;

    // Wednesday.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    fn log(days_ago: i64, kind: ActivityKind, duration: u32) -> ActivityLog {
        ActivityLog {
            id: format!("a{}", days_ago),
            user_id: "1".to_string(),
            kind,
            title: "Session".to_string(),
            duration,
            date: now() - Duration::days(days_ago),
            course_id: "1".to_string(),
            score: None,
        }
    }

    fn quiz(id: u32, status: ModuleStatus, score: Option<u8>) -> Module {
        Module {
            id,
            title: format!("Quiz {}", id),
            duration: 20,
            kind: ModuleKind::Quiz,
            status,
            score,
        }
    }

    fn course(id: &str, progress: u8, modules: Vec<Module>) -> Course {
        Course {
            id: id.to_string(),
            title: format!("Course {}", id),
            description: String::new(),
            instructor: String::new(),
            thumbnail: String::new(),
            duration: String::new(),
            total_modules: modules.len() as u32,
            completed_modules: 0,
            progress,
            category: String::new(),
            level: String::new(),
            modules,
        }
    }

    fn account(risk_score: u8) -> Account {
        Account {
            id: "1".to_string(),
            name: "Budi".to_string(),
            email: "budi@example.com".to_string(),
            role: Role::Student,
            avatar: String::new(),
            bio: String::new(),
            location: String::new(),
            phone: String::new(),
            university: String::new(),
            joined_date: now() - Duration::days(100),
            enrolled_courses: vec!["1".to_string(), "3".to_string()],
            assigned_students: vec![],
            total_study_time: 0,
            completed_modules: 0,
            risk_score,
        }
    }

    #[test]
    fn weekly_buckets_start_on_monday() {
        // now() is a Wednesday: 1 day ago is Tuesday, 3 days ago is Sunday,
        // 2 days ago is Monday.
        let logs = vec![
            log(1, ActivityKind::Video, 30),
            log(1, ActivityKind::Reading, 15),
            log(2, ActivityKind::Quiz, 20),
            log(3, ActivityKind::Video, 40),
            log(10, ActivityKind::Video, 999),
        ];
        let week = weekly_activity(&logs, now());

        assert_eq!(week.len(), 7);
        assert_eq!(week[0].day, "Mon");
        assert_eq!(week[0].study_time, 20);
        assert_eq!(week[1].day, "Tue");
        assert_eq!((week[1].study_time, week[1].activities), (45, 2));
        assert_eq!(week[6].day, "Sun");
        assert_eq!(week[6].study_time, 40);
        assert_eq!(week.iter().map(|d| d.study_time).sum::<u32>(), 105);
    }

    #[test]
    fn risk_levels_follow_bands() {
        assert_eq!(risk_level(0), RiskLevel::Low);
        assert_eq!(risk_level(29), RiskLevel::Low);
        assert_eq!(risk_level(30), RiskLevel::Medium);
        assert_eq!(risk_level(49), RiskLevel::Medium);
        assert_eq!(risk_level(50), RiskLevel::High);
        assert!(is_at_risk(50));
        assert!(!is_at_risk(49));
    }

    #[test]
    fn factor_status_tiers() {
        assert_eq!(factor_status(85), FactorStatus::Excellent);
        assert_eq!(factor_status(84), FactorStatus::Good);
        assert_eq!(factor_status(70), FactorStatus::Good);
        assert_eq!(factor_status(69), FactorStatus::Moderate);
    }

    #[test]
    fn quiz_average_ignores_unscored() {
        let c = course(
            "1",
            0,
            vec![
                quiz(1, ModuleStatus::Completed, Some(80)),
                quiz(2, ModuleStatus::Completed, None),
                quiz(3, ModuleStatus::InProgress, Some(90)),
            ],
        );
        let summary = quiz_summary(&c);
        assert_eq!(summary.total_quizzes, 3);
        assert_eq!(summary.completed_quizzes, 2);
        assert_eq!(summary.average_score, 85.0);
    }

    #[test]
    fn quiz_pass_threshold() {
        assert!(quiz_passed(Some(70)));
        assert!(!quiz_passed(Some(69)));
        assert!(!quiz_passed(None));
    }

    #[test]
    fn quiz_summary_of_course_without_quizzes() {
        let summary = quiz_summary(&course("1", 0, vec![]));
        assert_eq!(summary.total_quizzes, 0);
        assert_eq!(summary.average_score, 0.0);
    }

    #[test]
    fn average_progress_truncates() {
        let courses = vec![course("1", 65, vec![]), course("2", 40, vec![])];
        assert_eq!(average_progress(&courses), 52);
        assert_eq!(average_progress(&[]), 0);
    }

    #[test]
    fn breakdown_sums_by_kind() {
        let logs = vec![
            log(1, ActivityKind::Video, 45),
            log(2, ActivityKind::Reading, 30),
            log(3, ActivityKind::Quiz, 25),
            log(4, ActivityKind::Video, 60),
        ];
        let breakdown = activity_breakdown(&logs);
        assert_eq!((breakdown.video, breakdown.reading, breakdown.quiz), (105, 30, 25));
        assert_eq!(breakdown.total(), 160);
    }

    #[test]
    fn distribution_counts_each_band() {
        let dist = risk_distribution(&[25, 45, 72, 15, 58]);
        let counts: Vec<(String, u32)> = dist.into_iter().map(|d| (d.level, d.count)).collect();
        assert_eq!(
            counts,
            vec![("Low".to_string(), 2), ("Medium".to_string(), 1), ("High".to_string(), 2)]
        );
    }

    #[test]
    fn notifications_unread_then_newest() {
        let make = |id: &str, read: bool, hours_ago: i64| Notification {
            id: id.to_string(),
            user_id: "4".to_string(),
            kind: crate::domain::NotificationKind::Info,
            title: String::new(),
            message: String::new(),
            time: String::new(),
            created_at: now() - Duration::hours(hours_ago),
            read,
        };
        let ordered = order_notifications(vec![
            make("old-read", true, 48),
            make("new-read", true, 1),
            make("old-unread", false, 24),
            make("new-unread", false, 2),
        ]);
        let ids: Vec<&str> = ordered.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["new-unread", "old-unread", "new-read", "old-read"]);
    }

    #[test]
    fn risk_factors_reflect_activity_and_courses() {
        let logs = vec![
            log(0, ActivityKind::Video, 60),
            log(1, ActivityKind::Reading, 60),
            log(2, ActivityKind::Video, 60),
        ];
        let courses = vec![course(
            "1",
            50,
            vec![
                quiz(1, ModuleStatus::Completed, Some(80)),
                quiz(2, ModuleStatus::Locked, None),
            ],
        )];
        let factors = risk_factors(&logs, &courses, 60, now());
        let values: Vec<u8> = factors.iter().map(|f| f.value).collect();
        // 3 of 7 days, 1 of 2 modules, 180 of 420 minutes, quiz mean 80.
        assert_eq!(values, vec![42, 50, 42, 80]);
        assert_eq!(factors[3].status, FactorStatus::Good);
        assert_eq!(derived_risk_score(&factors), 47);
    }

    #[test]
    fn streak_counts_back_from_yesterday() {
        let logs = vec![log(1, ActivityKind::Video, 10), log(2, ActivityKind::Video, 10)];
        assert_eq!(study_streak(&logs, now()), 2);
        assert_eq!(study_streak(&[log(3, ActivityKind::Video, 10)], now()), 0);
    }

    #[test]
    fn mentor_stats_over_snapshots() {
        let active = StudentSnapshot {
            account: account(72),
            courses: vec![course("1", 60, vec![quiz(1, ModuleStatus::Completed, Some(85))])],
            activities: vec![log(1, ActivityKind::Video, 30)],
        };
        let idle = StudentSnapshot {
            account: account(20),
            courses: vec![course("2", 20, vec![quiz(1, ModuleStatus::Locked, None)])],
            activities: vec![],
        };
        let stats = mentor_stats(&[active.clone(), idle], &[], now());
        assert_eq!(stats.total_students, 2);
        assert_eq!(stats.active_students, 1);
        assert_eq!(stats.students_at_risk, 1);
        assert_eq!(stats.average_progress, 40.0);
        assert_eq!(stats.completion_rate, 50.0);

        let row = active.risk_row(now());
        assert_eq!(row.progress, 60);
        assert_eq!(row.trend, "improving");
        assert_eq!(students_at_risk(&[row]).len(), 1);
    }

    #[test]
    fn insight_warns_when_idle() {
        let empty = weekly_activity(&[], now());
        assert_eq!(student_insight(50, &empty, 60).kind, "warning");

        let busy = weekly_activity(&[log(1, ActivityKind::Video, 500)], now());
        assert_eq!(student_insight(50, &busy, 60).kind, "positive");
    }

    #[test]
    fn oversized_daily_goal_saturates() {
        let weekly = weekly_activity(&[log(1, ActivityKind::Video, 30)], now());
        assert_eq!(student_insight(50, &weekly, u32::MAX).kind, "neutral");

        let factors = risk_factors(&[log(1, ActivityKind::Video, 30)], &[], u32::MAX, now());
        assert_eq!(factors[2].value, 0);
    }
}
