// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, types::Json};

use crate::{
    models::{
        badge::EarnedBadge,
        quiz::{NewQuiz, Quiz},
        result::QuizResult,
        user::{NewUser, Standing, User},
    },
    services::ledger::{LedgerEntry, LedgerReceipt},
    store::{LedgerWriter, QuizCatalog, ResultStore, StoreError, StoreResult, UserStore},
};

const QUIZ_COLUMNS: &str =
    "id, title, description, questions, time_limit, difficulty, points, subject, created_at";

const RESULT_COLUMNS: &str = "id, user_id, quiz_id, submission_key, quiz_title, score, \
     total_questions, percentage, points_earned, time_spent, breakdown, new_badges, created_at";

/// Helper struct for the 'users' table; badges live in 'user_badges'.
#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    points: i64,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl UserRow {
    fn with_badges(self, badges: Vec<EarnedBadge>) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password: self.password,
            points: self.points,
            badges,
            created_at: self.created_at,
        }
    }
}

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_badges(&self, user_id: i64) -> StoreResult<Vec<EarnedBadge>> {
        let badges = sqlx::query_as::<_, EarnedBadge>(
            r#"
            SELECT badge_name AS name, TRUE AS earned, earned_at
            FROM user_badges
            WHERE user_id = $1
            ORDER BY earned_at, badge_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    async fn attach_badges(&self, row: Option<UserRow>) -> StoreResult<Option<User>> {
        match row {
            Some(row) => {
                let badges = self.load_badges(row.id).await?;
                Ok(Some(row.with_badges(badges)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl QuizCatalog for PgStore {
    async fn list_quizzes(&self) -> StoreResult<Vec<Quiz>> {
        let quizzes = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {} FROM quizzes ORDER BY id",
            QUIZ_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    async fn find_quiz(&self, id: i64) -> StoreResult<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {} FROM quizzes WHERE id = $1",
            QUIZ_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn count_quizzes(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert_quiz(&self, quiz: NewQuiz) -> StoreResult<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            INSERT INTO quizzes (title, description, questions, time_limit, difficulty, points, subject)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            QUIZ_COLUMNS
        ))
        .bind(quiz.title)
        .bind(quiz.description)
        .bind(Json(quiz.questions))
        .bind(quiz.time_limit)
        .bind(quiz.difficulty)
        .bind(quiz.points)
        .bind(quiz.subject)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password, points, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::Duplicate(_) => {
                StoreError::Duplicate(format!("Email '{}' is already registered", user.email))
            }
            other => other,
        })?;

        Ok(row.with_badges(Vec::new()))
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password, points, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.attach_badges(row).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password, points, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        self.attach_badges(row).await
    }

    async fn standings(&self, limit: usize) -> StoreResult<Vec<Standing>> {
        let standings = sqlx::query_as::<_, Standing>(
            r#"
            SELECT
                u.id,
                u.name,
                u.points,
                (SELECT COUNT(*) FROM user_badges b WHERE b.user_id = u.id) AS badge_count
            FROM users u
            ORDER BY u.points DESC, u.id ASC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(standings)
    }
}

#[async_trait]
impl ResultStore for PgStore {
    async fn count_by_user(&self, user_id: i64) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_results WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn results_by_user(&self, user_id: i64) -> StoreResult<Vec<QuizResult>> {
        let results = sqlx::query_as::<_, QuizResult>(&format!(
            "SELECT {} FROM quiz_results WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            RESULT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }
}

#[async_trait]
impl LedgerWriter for PgStore {
    /// Runs the append, the point increment and the badge grants in one
    /// transaction. Dropping the future before commit rolls everything back.
    async fn apply(&self, entry: &LedgerEntry) -> StoreResult<LedgerReceipt> {
        let mut tx = self.pool.begin().await?;

        // Append the result unless this submission key was already applied.
        let inserted = sqlx::query_as::<_, QuizResult>(&format!(
            r#"
            INSERT INTO quiz_results (
                user_id, quiz_id, submission_key, quiz_title, score, total_questions,
                percentage, points_earned, time_spent, breakdown, new_badges
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id, submission_key) DO NOTHING
            RETURNING {}
            "#,
            RESULT_COLUMNS
        ))
        .bind(entry.user_id)
        .bind(entry.quiz_id)
        .bind(entry.submission_key)
        .bind(&entry.quiz_title)
        .bind(entry.outcome.correct_count)
        .bind(entry.outcome.total_questions)
        .bind(entry.outcome.percentage)
        .bind(entry.outcome.points_earned)
        .bind(entry.time_spent)
        .bind(Json(entry.outcome.breakdown.clone()))
        .bind(Json(entry.badges.clone()))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(result) = inserted else {
            tx.rollback().await?;

            let existing = sqlx::query_as::<_, QuizResult>(&format!(
                "SELECT {} FROM quiz_results WHERE user_id = $1 AND submission_key = $2",
                RESULT_COLUMNS
            ))
            .bind(entry.user_id)
            .bind(entry.submission_key)
            .fetch_one(&self.pool)
            .await?;

            return LedgerReceipt::replay(existing, entry);
        };

        // Add the earned points to the user.
        let updated = sqlx::query("UPDATE users SET points = points + $1 WHERE id = $2")
            .bind(entry.outcome.points_earned)
            .bind(entry.user_id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::Missing(format!("User {} not found", entry.user_id)));
        }

        let mut granted_badges = Vec::new();
        for badge in &entry.badges {
            let added = sqlx::query(
                r#"
                INSERT INTO user_badges (user_id, badge_name, earned_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, badge_name) DO NOTHING
                "#,
            )
            .bind(entry.user_id)
            .bind(badge)
            .bind(result.created_at)
            .execute(&mut *tx)
            .await?;

            if added.rows_affected() == 1 {
                granted_badges.push(badge.clone());
            }
        }

        tx.commit().await?;

        Ok(LedgerReceipt {
            result,
            granted_badges,
            replayed: false,
        })
    }
}
