// src/models/badge.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named achievement and the rule that unlocks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    /// Unique key.
    pub name: String,
    pub description: String,
    pub icon: String,
    pub requirement: Requirement,
}

/// Unlocking predicate of a badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    /// Total number of completed quizzes reaches `count`.
    QuizzesCompleted { count: i64 },

    /// 100% on a single quiz.
    PerfectScore,

    /// Quiz finished in strictly fewer than `under_secs` seconds.
    Speed { under_secs: i64 },

    /// Cumulative points reach `points`.
    TotalPoints { points: i64 },

    /// `count` consecutive passing results.
    Streak { count: i64 },

    /// Quiz title contains `keyword` (case-insensitive) and the score is at
    /// least `min_percentage`.
    SpecificQuiz { keyword: String, min_percentage: i64 },
}

/// A badge held by a user. Represents a row of the 'user_badges' table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub name: String,
    pub earned: bool,
    pub earned_at: chrono::DateTime<chrono::Utc>,
}
