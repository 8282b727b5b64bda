// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;
use validator::Validate;

use crate::models::badge::BadgeDefinition;

/// Represents the 'quiz_results' table in the database.
/// Append-only: one row per accepted submission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,

    /// Idempotency key of the submission that produced this row.
    pub submission_key: Uuid,

    /// Title at submission time, kept even if the quiz changes later.
    pub quiz_title: String,

    /// Number of correctly answered questions.
    pub score: i64,
    pub total_questions: i64,
    pub percentage: i64,
    pub points_earned: i64,
    pub time_spent: i64,

    pub breakdown: Json<Vec<QuestionBreakdown>>,

    /// Names of the badges earned by this submission.
    pub new_badges: Json<Vec<String>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Per-question scoring detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBreakdown {
    pub question: String,
    pub user_answer: Option<i64>,
    pub correct_answer: i64,
    pub is_correct: bool,
    pub points: i64,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    /// Selected option index per question, by position. `null` = unanswered.
    #[validate(length(max = 500, message = "Too many answers"))]
    pub answers: Vec<Option<i64>>,

    /// Elapsed time in seconds.
    #[validate(range(min = 0, message = "time_spent must not be negative"))]
    pub time_spent: i64,

    /// Idempotency key. Resubmitting with the same key replays the stored result.
    pub submission_id: Option<Uuid>,
}

/// Response body of a quiz submission.
#[derive(Debug, Serialize)]
pub struct SubmissionReport {
    pub result_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: i64,
    pub points_earned: i64,
    pub time_spent: i64,

    /// Badges earned by this submission.
    pub new_badges: Vec<BadgeDefinition>,

    /// Names of badges actually added to the user's record (not held before).
    pub granted_badges: Vec<String>,

    pub per_question: Vec<QuestionBreakdown>,

    /// True when the submission key was already applied and this is the stored result.
    pub replayed: bool,
}
