// src/services/progress.rs

use serde::Serialize;

use crate::{
    config::RECENT_RESULTS_LIMIT,
    models::{badge::EarnedBadge, result::QuizResult, user::User},
    services::scorer::rounded_div,
};

/// A user's learning progress.
#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    pub total_quizzes: i64,
    pub completed_quizzes: i64,
    pub total_points: i64,
    /// Rounded mean percentage over all results, 0 without results.
    pub average_score: i64,
    pub earned_badges: Vec<EarnedBadge>,
    /// Newest first.
    pub recent_results: Vec<QuizResult>,
}

/// Summarizes `history`, which must be ordered newest first.
pub fn summarize(user: &User, history: &[QuizResult], total_quizzes: i64) -> ProgressSummary {
    let completed = history.len() as i64;
    let percentage_sum: i64 = history.iter().map(|r| r.percentage).sum();

    ProgressSummary {
        total_quizzes,
        completed_quizzes: completed,
        total_points: user.points,
        average_score: average_score(percentage_sum, completed),
        earned_badges: user.badges.iter().filter(|b| b.earned).cloned().collect(),
        recent_results: history.iter().take(RECENT_RESULTS_LIMIT).cloned().collect(),
    }
}

fn average_score(percentage_sum: i64, count: i64) -> i64 {
    rounded_div(percentage_sum, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: String::new(),
            points: 240,
            badges: vec![EarnedBadge {
                name: "First Steps".to_string(),
                earned: true,
                earned_at: chrono::Utc::now(),
            }],
            created_at: None,
        }
    }

    fn result(id: i64, percentage: i64) -> QuizResult {
        QuizResult {
            id,
            user_id: 1,
            quiz_id: 1,
            submission_key: Uuid::new_v4(),
            quiz_title: "JavaScript Fundamentals".to_string(),
            score: 0,
            total_questions: 4,
            percentage,
            points_earned: 0,
            time_spent: 100,
            breakdown: Json(Vec::new()),
            new_badges: Json(Vec::new()),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_empty_history_is_defined() {
        let summary = summarize(&user(), &[], 3);
        assert_eq!(summary.total_quizzes, 3);
        assert_eq!(summary.completed_quizzes, 0);
        assert_eq!(summary.average_score, 0);
        assert!(summary.recent_results.is_empty());
        assert_eq!(summary.total_points, 240);
        assert_eq!(summary.earned_badges.len(), 1);
    }

    #[test]
    fn test_average_is_rounded_mean() {
        let history = vec![result(3, 100), result(2, 75), result(1, 50)];
        let summary = summarize(&user(), &history, 3);
        assert_eq!(summary.completed_quizzes, 3);
        assert_eq!(summary.average_score, 75);

        let history = vec![result(2, 100), result(1, 67)];
        assert_eq!(summarize(&user(), &history, 3).average_score, 84);
    }

    #[test]
    fn test_recent_results_capped_and_newest_first() {
        let history: Vec<QuizResult> = (1..=8).rev().map(|id| result(id, 50)).collect();
        let summary = summarize(&user(), &history, 3);

        assert_eq!(summary.completed_quizzes, 8);
        let ids: Vec<i64> = summary.recent_results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![8, 7, 6, 5, 4]);
    }
}
