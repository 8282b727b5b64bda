// src/services/recommend.rs

use std::collections::HashSet;

use crate::models::{quiz::Quiz, result::QuizResult};

/// Picks quizzes the user has not completed yet, preferring the difficulty
/// that matches their average score, then filling up with the rest.
pub fn recommend<'a>(
    quizzes: &'a [Quiz],
    history: &[QuizResult],
    average_score: i64,
    limit: usize,
) -> Vec<&'a Quiz> {
    let completed: HashSet<i64> = history.iter().map(|r| r.quiz_id).collect();
    let available: Vec<&Quiz> = quizzes.iter().filter(|q| !completed.contains(&q.id)).collect();

    let target = match average_score {
        s if s >= 80 => "advanced",
        s if s >= 60 => "intermediate",
        _ => "beginner",
    };

    let mut picked: Vec<&Quiz> = available
        .iter()
        .copied()
        .filter(|q| q.difficulty.eq_ignore_ascii_case(target))
        .take(2.min(limit))
        .collect();

    for quiz in available {
        if picked.len() >= limit {
            break;
        }
        if !picked.iter().any(|p| p.id == quiz.id) {
            picked.push(quiz);
        }
    }

    picked
}
