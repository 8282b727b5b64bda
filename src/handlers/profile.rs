// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    config::RECOMMENDATION_LIMIT,
    error::AppError,
    models::{
        quiz::PublicQuiz,
        user::{User, UserProfile},
    },
    services::{progress, recommend},
    state::AppState,
    utils::jwt::Claims,
};

async fn load_user(state: &AppState, user_id: i64) -> Result<User, AppError> {
    state
        .users
        .find_user_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))
}

/// Progress summary for a user: completions, points, average score,
/// badges and the five most recent results.
pub async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, user_id).await?;
    let history = state.results.results_by_user(user.id).await?;
    let total_quizzes = state.quizzes.count_quizzes().await?;

    Ok(Json(progress::summarize(&user, &history, total_quizzes)))
}

/// Get current user's profile.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, claims.user_id()?).await?;

    Ok(Json(UserProfile::from(user)))
}

/// Badges earned by the current user.
pub async fn list_my_badges(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, claims.user_id()?).await?;

    Ok(Json(user.badges))
}

/// Quizzes suggested for the current user based on their average score.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, claims.user_id()?).await?;
    let history = state.results.results_by_user(user.id).await?;
    let quizzes = state.quizzes.list_quizzes().await?;

    let summary = progress::summarize(&user, &history, quizzes.len() as i64);
    let picked: Vec<PublicQuiz> =
        recommend::recommend(&quizzes, &history, summary.average_score, RECOMMENDATION_LIMIT)
            .into_iter()
            .map(PublicQuiz::from)
            .collect();

    Ok(Json(picked))
}
