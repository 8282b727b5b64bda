// src/store/mod.rs

//! Storage seams. Handlers and services only see these traits; `PgStore`
//! backs them with Postgres and `MemoryStore` keeps everything in process.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    models::{
        quiz::{NewQuiz, Quiz},
        result::QuizResult,
        user::{NewUser, Standing, User},
    },
    services::ledger::{LedgerEntry, LedgerReceipt},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// Concurrent writers collided; the operation may be retried.
    #[error("write conflict: {0}")]
    Conflict(String),

    /// A referenced record does not exist.
    #[error("missing record: {0}")]
    Missing(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Maps driver errors by SQLSTATE.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => return StoreError::Duplicate(db_err.message().to_string()),
                // serialization_failure, deadlock_detected
                Some("40001") | Some("40P01") => {
                    return StoreError::Conflict(db_err.message().to_string());
                }
                // foreign_key_violation
                Some("23503") => return StoreError::Missing(db_err.message().to_string()),
                _ => {}
            }
        }
        StoreError::Unavailable(err.to_string())
    }
}

/// Read access to quizzes, answer keys included.
#[async_trait]
pub trait QuizCatalog: Send + Sync {
    async fn list_quizzes(&self) -> StoreResult<Vec<Quiz>>;

    async fn find_quiz(&self, id: i64) -> StoreResult<Option<Quiz>>;

    async fn count_quizzes(&self) -> StoreResult<i64>;

    /// Only used for seeding; quizzes are immutable afterwards.
    async fn insert_quiz(&self, quiz: NewQuiz) -> StoreResult<Quiz>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Duplicate` when the email is taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// At least the `limit` best users, in creation order among equal points.
    async fn standings(&self, limit: usize) -> StoreResult<Vec<Standing>>;
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn count_by_user(&self, user_id: i64) -> StoreResult<i64>;

    /// Full result history of a user, newest first. Progress averages need
    /// every result, so there is no separate limited query.
    async fn results_by_user(&self, user_id: i64) -> StoreResult<Vec<QuizResult>>;
}

/// The single write path for submissions.
///
/// One call appends the result, adds the points with an atomic increment and
/// grants each badge only if absent, as one unit. A submission key that was
/// already applied returns the stored result with `replayed` set and changes
/// nothing; reusing it for a different quiz is a `Duplicate` error.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    async fn apply(&self, entry: &LedgerEntry) -> StoreResult<LedgerReceipt>;
}
