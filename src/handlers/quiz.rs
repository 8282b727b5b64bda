// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::LEADERBOARD_SIZE,
    error::AppError,
    models::{quiz::PublicQuiz, result::SubmitQuizRequest},
    services::{
        leaderboard,
        submission::{self, Submission},
    },
    state::AppState,
    utils::jwt::Claims,
};

/// Lists all quizzes without their answer keys.
pub async fn list_quizzes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let quizzes: Vec<PublicQuiz> = state
        .quizzes
        .list_quizzes()
        .await?
        .iter()
        .map(PublicQuiz::from)
        .collect();

    Ok(Json(quizzes))
}

/// Returns one quiz without its answer key.
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = state
        .quizzes
        .find_quiz(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(PublicQuiz::from(&quiz)))
}

/// Submits answers for a quiz.
///
/// * The user comes from the token, never from the body.
/// * Scores the answers, evaluates badges and applies points on the ledger.
/// * Resubmitting with the same `submission_id` returns the stored result.
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    let report = submission::submit_quiz(
        &state,
        Submission {
            quiz_id: id,
            user_id,
            answers: req.answers,
            time_spent: req.time_spent,
            submission_key: req.submission_id.unwrap_or_else(Uuid::new_v4),
        },
    )
    .await?;

    let badges = (!report.new_badges.is_empty()).then(|| {
        report
            .new_badges
            .iter()
            .map(|b| format!("{} {}", b.icon, b.name))
            .collect::<Vec<_>>()
            .join(", ")
    });

    Ok(Json(serde_json::json!({
        "message": format!(
            "Quiz completed! You scored {}% and earned {} points!",
            report.percentage, report.points_earned
        ),
        "badges": badges,
        "result": report,
    })))
}

/// Retrieves the top users by points.
pub async fn get_leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let standings = state.users.standings(LEADERBOARD_SIZE).await?;

    Ok(Json(leaderboard::rank(standings, LEADERBOARD_SIZE)))
}

/// Lists every badge that can be earned.
pub async fn list_badges(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.badges.badges().to_vec())
}
