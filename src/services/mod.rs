// src/services/mod.rs

//! Quiz submission workflow and the read-side projections built on it.

pub mod badges;
pub mod leaderboard;
pub mod ledger;
pub mod progress;
pub mod recommend;
pub mod scorer;
pub mod submission;

use thiserror::Error;

use crate::store::StoreError;

/// Failures of the submission workflow.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("duplicate submission: {0}")]
    DuplicateSubmission(String),

    #[error("persistence conflict: {0}")]
    PersistenceConflict(String),

    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),
}

impl From<StoreError> for QuizError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing(msg) => QuizError::NotFound(msg),
            StoreError::Duplicate(msg) => QuizError::DuplicateSubmission(msg),
            StoreError::Conflict(msg) => QuizError::PersistenceConflict(msg),
            StoreError::Unavailable(msg) => QuizError::DependencyUnavailable(msg),
        }
    }
}
