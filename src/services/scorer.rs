// src/services/scorer.rs

use crate::{
    models::{quiz::Quiz, result::QuestionBreakdown},
    services::QuizError,
};

/// Result of scoring one submission, before badges or persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub correct_count: i64,
    pub total_questions: i64,
    /// Rounded, 0..=100. Zero when the quiz has no questions.
    pub percentage: i64,
    /// Sum of the point values of correctly answered questions.
    pub points_earned: i64,
    pub breakdown: Vec<QuestionBreakdown>,
}

/// Rejects malformed submissions before any scoring happens.
///
/// Fewer answers than questions is accepted: the trailing questions are
/// scored as unanswered.
pub fn validate_submission(
    quiz: &Quiz,
    answers: &[Option<i64>],
    time_spent: i64,
) -> Result<(), QuizError> {
    if time_spent < 0 {
        return Err(QuizError::InvalidSubmission(
            "time_spent must not be negative".to_string(),
        ));
    }

    if answers.len() > quiz.questions.len() {
        return Err(QuizError::InvalidSubmission(format!(
            "{} answers submitted for {} questions",
            answers.len(),
            quiz.questions.len()
        )));
    }

    for (index, (answer, question)) in answers.iter().zip(quiz.questions.iter()).enumerate() {
        if let Some(choice) = answer {
            if *choice < 0 || *choice as usize >= question.options.len() {
                return Err(QuizError::InvalidSubmission(format!(
                    "answer {} for question {} is not a valid option",
                    choice,
                    index + 1
                )));
            }
        }
    }

    Ok(())
}

/// Scores `answers` against the quiz answer key. Pure.
pub fn score(quiz: &Quiz, answers: &[Option<i64>]) -> Outcome {
    let mut correct_count = 0;
    let mut points_earned = 0;

    let breakdown: Vec<QuestionBreakdown> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let user_answer = answers.get(index).copied().flatten();
            let is_correct = user_answer == Some(question.correct_answer);
            let points = if is_correct { question.point_value() } else { 0 };

            if is_correct {
                correct_count += 1;
                points_earned += points;
            }

            QuestionBreakdown {
                question: question.question.clone(),
                user_answer,
                correct_answer: question.correct_answer,
                is_correct,
                points,
            }
        })
        .collect();

    let total_questions = breakdown.len() as i64;

    Outcome {
        correct_count,
        total_questions,
        percentage: percentage(correct_count, total_questions),
        points_earned,
        breakdown,
    }
}

/// `round(100 * correct / total)`, or 0 for an empty quiz.
pub fn percentage(correct: i64, total: i64) -> i64 {
    rounded_div(100 * correct, total)
}

/// Integer division rounding halves up, for non-negative operands.
/// A zero divisor yields 0.
pub(crate) fn rounded_div(numerator: i64, denominator: i64) -> i64 {
    if denominator <= 0 {
        return 0;
    }
    (2 * numerator + denominator) / (2 * denominator)
}
