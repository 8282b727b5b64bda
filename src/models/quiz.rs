// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Represents the 'quizzes' table in the database.
/// Questions are stored as one JSON document so their order is preserved.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,

    pub title: String,

    pub description: Option<String>,

    /// Ordered questions. Answers are correlated with questions by position.
    pub questions: Json<Vec<Question>>,

    /// Time limit in seconds.
    pub time_limit: i64,

    /// Difficulty label: 'beginner', 'intermediate' or 'advanced'.
    pub difficulty: String,

    /// Total point value advertised for the quiz.
    pub points: i64,

    pub subject: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One multiple-choice question, including its answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// The prompt text.
    pub question: String,

    pub options: Vec<String>,

    /// Zero-based index into `options`.
    pub correct_answer: i64,

    /// Points awarded for a correct answer. Missing values count as zero.
    #[serde(default)]
    pub points: Option<i64>,
}

impl Question {
    /// Normalized point value: missing or negative values are worth zero.
    pub fn point_value(&self) -> i64 {
        self.points.unwrap_or(0).max(0)
    }
}

/// Quiz content used when seeding the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuiz {
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub time_limit: i64,
    pub difficulty: String,
    pub points: i64,
    pub subject: Option<String>,
}

/// DTO for sending a quiz to the client (answer key removed).
#[derive(Debug, Serialize)]
pub struct PublicQuiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<PublicQuestion>,
    pub time_limit: i64,
    pub difficulty: String,
    pub points: i64,
    pub subject: Option<String>,
}

/// DTO for sending a question to the client (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub points: i64,
}

impl From<&Quiz> for PublicQuiz {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            questions: quiz
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    question: q.question.clone(),
                    options: q.options.clone(),
                    points: q.point_value(),
                })
                .collect(),
            time_limit: quiz.time_limit,
            difficulty: quiz.difficulty.clone(),
            points: quiz.points,
            subject: quiz.subject.clone(),
        }
    }
}
