// src/services/ledger.rs

use std::{sync::Arc, time::Duration};

use uuid::Uuid;

use crate::{
    models::result::QuizResult,
    services::{QuizError, scorer::Outcome},
    store::{LedgerWriter, StoreError},
};

/// Everything the ledger records for one accepted submission.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub user_id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub submission_key: Uuid,
    pub outcome: Outcome,
    pub time_spent: i64,
    /// Names of the badges earned by this submission, in catalog order.
    pub badges: Vec<String>,
}

/// What a ledger write actually did.
#[derive(Debug, Clone)]
pub struct LedgerReceipt {
    pub result: QuizResult,
    /// Badges that were not held before and have now been added.
    pub granted_badges: Vec<String>,
    /// The submission key had already been applied; nothing was changed.
    pub replayed: bool,
}

impl LedgerReceipt {
    /// Receipt for a submission key that was already applied.
    /// A key reused for another quiz is rejected as a duplicate.
    pub fn replay(existing: QuizResult, entry: &LedgerEntry) -> Result<Self, StoreError> {
        if existing.quiz_id != entry.quiz_id {
            return Err(StoreError::Duplicate(format!(
                "Submission {} was already used for quiz {}",
                entry.submission_key, existing.quiz_id
            )));
        }

        Ok(Self {
            result: existing,
            granted_badges: Vec::new(),
            replayed: true,
        })
    }
}

/// Applies submissions to user accounts, all-or-nothing, retrying on write
/// conflicts and bounded by a timeout.
#[derive(Clone)]
pub struct Ledger {
    writer: Arc<dyn LedgerWriter>,
    max_retries: u32,
    timeout: Duration,
}

impl Ledger {
    pub fn new(writer: Arc<dyn LedgerWriter>, max_retries: u32, timeout: Duration) -> Self {
        Self {
            writer,
            max_retries,
            timeout,
        }
    }

    /// Applies `entry`. Every attempt and backoff shares one deadline.
    pub async fn apply(&self, entry: &LedgerEntry) -> Result<LedgerReceipt, QuizError> {
        match tokio::time::timeout(self.timeout, self.apply_with_retries(entry)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "Ledger write for submission {} timed out after {:?}",
                    entry.submission_key,
                    self.timeout
                );
                Err(QuizError::DependencyUnavailable(
                    "ledger write timed out".to_string(),
                ))
            }
        }
    }

    async fn apply_with_retries(&self, entry: &LedgerEntry) -> Result<LedgerReceipt, QuizError> {
        let mut attempt = 0;

        loop {
            match self.writer.apply(entry).await {
                Ok(receipt) => {
                    if receipt.replayed {
                        tracing::info!(
                            "Submission {} for user {} already applied, replaying result {}",
                            entry.submission_key,
                            entry.user_id,
                            receipt.result.id
                        );
                    } else {
                        tracing::info!(
                            "User {} earned {} points on quiz {} (badges granted: {:?})",
                            entry.user_id,
                            entry.outcome.points_earned,
                            entry.quiz_id,
                            receipt.granted_badges
                        );
                    }
                    return Ok(receipt);
                }
                Err(StoreError::Conflict(msg)) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Ledger write conflict for user {} (attempt {}): {}",
                        entry.user_id,
                        attempt,
                        msg
                    );
                    tokio::time::sleep(Duration::from_millis(25 * attempt as u64)).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
