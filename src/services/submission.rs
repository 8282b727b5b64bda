// src/services/submission.rs

use uuid::Uuid;

use crate::{
    models::result::{QuizResult, SubmissionReport},
    services::{
        QuizError,
        badges::{BadgeCatalog, BadgeEvaluator, HistorySnapshot, SubmissionContext},
        ledger::{LedgerEntry, LedgerReceipt},
        scorer,
    },
    state::AppState,
};

/// A quiz attempt as received from an authenticated user.
#[derive(Debug, Clone)]
pub struct Submission {
    pub quiz_id: i64,
    pub user_id: i64,
    pub answers: Vec<Option<i64>>,
    pub time_spent: i64,
    pub submission_key: Uuid,
}

/// Scores a submission, works out its badges and records it on the ledger.
pub async fn submit_quiz(state: &AppState, submission: Submission) -> Result<SubmissionReport, QuizError> {
    let quiz = state
        .quizzes
        .find_quiz(submission.quiz_id)
        .await?
        .ok_or_else(|| QuizError::NotFound(format!("Quiz {} not found", submission.quiz_id)))?;

    let user = state
        .users
        .find_user_by_id(submission.user_id)
        .await?
        .ok_or_else(|| QuizError::NotFound(format!("User {} not found", submission.user_id)))?;

    scorer::validate_submission(&quiz, &submission.answers, submission.time_spent)?;
    let outcome = scorer::score(&quiz, &submission.answers);

    let evaluator = BadgeEvaluator::new(&state.badges);
    let earned = if state.config.history_badges {
        // The count is implied by the full history.
        let history = state.results.results_by_user(user.id).await?;
        let per_submission = evaluator.evaluate_submission(&SubmissionContext {
            outcome: &outcome,
            quiz: &quiz,
            time_spent: submission.time_spent,
            prior_results: history.len() as i64,
        });
        let snapshot = HistorySnapshot::after_submission(user.points, &history, &outcome);
        evaluator.merge(per_submission, evaluator.evaluate_history(&snapshot))
    } else {
        let prior_results = state.results.count_by_user(user.id).await?;
        evaluator.evaluate_submission(&SubmissionContext {
            outcome: &outcome,
            quiz: &quiz,
            time_spent: submission.time_spent,
            prior_results,
        })
    };

    let entry = LedgerEntry {
        user_id: user.id,
        quiz_id: quiz.id,
        quiz_title: quiz.title.clone(),
        submission_key: submission.submission_key,
        outcome,
        time_spent: submission.time_spent,
        badges: earned.into_iter().map(|b| b.name).collect(),
    };

    let receipt = state.ledger.apply(&entry).await?;

    Ok(build_report(receipt, &state.badges))
}

/// Builds the response from what was stored, so a replayed submission
/// reports exactly what the first one did.
fn build_report(receipt: LedgerReceipt, catalog: &BadgeCatalog) -> SubmissionReport {
    let LedgerReceipt {
        result,
        granted_badges,
        replayed,
    } = receipt;

    let QuizResult {
        id,
        score,
        total_questions,
        percentage,
        points_earned,
        time_spent,
        breakdown,
        new_badges,
        ..
    } = result;

    SubmissionReport {
        result_id: id,
        score,
        total_questions,
        percentage,
        points_earned,
        time_spent,
        new_badges: new_badges
            .0
            .iter()
            .filter_map(|name| catalog.find(name).cloned())
            .collect(),
        granted_badges,
        per_question: breakdown.0,
        replayed,
    }
}
