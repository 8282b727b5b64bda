// src/store/memory.rs

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use sqlx::types::Json;

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

/// In-process store for development and tests.
///
/// Every operation takes the lock, works synchronously and releases it before
/// returning, so no guard is ever held across an await point.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    quizzes: Vec<Quiz>,
    /// Insertion order is creation order.
    users: Vec<User>,
    /// Insertion order is acceptance order.
    results: Vec<QuizResult>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl QuizCatalog for MemoryStore {
    async fn list_quizzes(&self) -> StoreResult<Vec<Quiz>> {
        Ok(self.read()?.quizzes.clone())
    }

    async fn find_quiz(&self, id: i64) -> StoreResult<Option<Quiz>> {
        Ok(self.read()?.quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn count_quizzes(&self) -> StoreResult<i64> {
        Ok(self.read()?.quizzes.len() as i64)
    }

    async fn insert_quiz(&self, quiz: NewQuiz) -> StoreResult<Quiz> {
        let mut inner = self.write()?;
        let quiz = Quiz {
            id: inner.quizzes.len() as i64 + 1,
            title: quiz.title,
            description: quiz.description,
            questions: Json(quiz.questions),
            time_limit: quiz.time_limit,
            difficulty: quiz.difficulty,
            points: quiz.points,
            subject: quiz.subject,
            created_at: Some(chrono::Utc::now()),
        };
        inner.quizzes.push(quiz.clone());
        Ok(quiz)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.write()?;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        let user = User {
            id: inner.users.len() as i64 + 1,
            name: user.name,
            email: user.email,
            password: user.password_hash,
            points: 0,
            badges: Vec::new(),
            created_at: Some(chrono::Utc::now()),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn standings(&self, _limit: usize) -> StoreResult<Vec<Standing>> {
        Ok(self
            .read()?
            .users
            .iter()
            .map(|u| Standing {
                id: u.id,
                name: u.name.clone(),
                points: u.points,
                badge_count: u.badges.iter().filter(|b| b.earned).count() as i64,
            })
            .collect())
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn count_by_user(&self, user_id: i64) -> StoreResult<i64> {
        Ok(self.read()?.results.iter().filter(|r| r.user_id == user_id).count() as i64)
    }

    async fn results_by_user(&self, user_id: i64) -> StoreResult<Vec<QuizResult>> {
        Ok(self
            .read()?
            .results
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LedgerWriter for MemoryStore {
    async fn apply(&self, entry: &LedgerEntry) -> StoreResult<LedgerReceipt> {
        let mut inner = self.write()?;

        if let Some(existing) = inner
            .results
            .iter()
            .find(|r| r.user_id == entry.user_id && r.submission_key == entry.submission_key)
        {
            return LedgerReceipt::replay(existing.clone(), entry);
        }

        let result_id = inner.results.len() as i64 + 1;
        let now = chrono::Utc::now();

        // Validate before mutating anything so a failure leaves no trace.
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == entry.user_id)
            .ok_or_else(|| StoreError::Missing(format!("User {} not found", entry.user_id)))?;

        user.points += entry.outcome.points_earned;

        let mut granted_badges = Vec::new();
        for badge in &entry.badges {
            if !user.badges.iter().any(|b| &b.name == badge) {
                user.badges.push(EarnedBadge {
                    name: badge.clone(),
                    earned: true,
                    earned_at: now,
                });
                granted_badges.push(badge.clone());
            }
        }

        let result = QuizResult {
            id: result_id,
            user_id: entry.user_id,
            quiz_id: entry.quiz_id,
            submission_key: entry.submission_key,
            quiz_title: entry.quiz_title.clone(),
            score: entry.outcome.correct_count,
            total_questions: entry.outcome.total_questions,
            percentage: entry.outcome.percentage,
            points_earned: entry.outcome.points_earned,
            time_spent: entry.time_spent,
            breakdown: Json(entry.outcome.breakdown.clone()),
            new_badges: Json(entry.badges.clone()),
            created_at: now,
        };
        inner.results.push(result.clone());

        Ok(LedgerReceipt {
            result,
            granted_badges,
            replayed: false,
        })
    }
}
