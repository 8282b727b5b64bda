// src/services/badges.rs

use std::collections::HashSet;

use serde::Deserialize;

use crate::{
    config::STREAK_PASS_PERCENTAGE,
    models::{
        badge::{BadgeDefinition, Requirement},
        quiz::Quiz,
        result::QuizResult,
    },
    services::scorer::Outcome,
};

/// Immutable table of badge definitions, in evaluation order.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct BadgeCatalog {
    badges: Vec<BadgeDefinition>,
}

impl BadgeCatalog {
    pub fn new(badges: Vec<BadgeDefinition>) -> Self {
        Self { badges }
    }

    /// Parses a catalog from a JSON array of badge definitions.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// The badges shipped with the application.
    pub fn standard() -> Self {
        let badge = |name: &str, description: &str, icon: &str, requirement| BadgeDefinition {
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            requirement,
        };
        let subject = |keyword: &str| Requirement::SpecificQuiz {
            keyword: keyword.to_string(),
            min_percentage: 90,
        };

        Self::new(vec![
            badge("First Steps", "Complete your first quiz", "🎯", Requirement::QuizzesCompleted { count: 1 }),
            badge("Knowledge Seeker", "Complete 5 quizzes", "📚", Requirement::QuizzesCompleted { count: 5 }),
            badge("Quiz Master", "Complete 10 quizzes", "🏆", Requirement::QuizzesCompleted { count: 10 }),
            badge("Perfect Score", "Get 100% on any quiz", "⭐", Requirement::PerfectScore),
            badge("Speed Demon", "Complete a quiz in under 2 minutes", "⚡", Requirement::Speed { under_secs: 120 }),
            badge("Point Collector", "Earn 500 points", "💎", Requirement::TotalPoints { points: 500 }),
            badge("Streak Master", "Complete 3 quizzes in a row", "🔥", Requirement::Streak { count: 3 }),
            badge("JavaScript Ninja", "Complete JavaScript Fundamentals with 90%+", "🥷", subject("javascript")),
            badge("React Rockstar", "Complete React Basics with 90%+", "⚛️", subject("react")),
            badge("Node.js Expert", "Complete Node.js Essentials with 90%+", "🚀", subject("node")),
        ])
    }

    pub fn badges(&self) -> &[BadgeDefinition] {
        &self.badges
    }

    pub fn find(&self, name: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.name == name)
    }
}

/// Facts about a single submission that badge rules may look at.
#[derive(Debug)]
pub struct SubmissionContext<'a> {
    pub outcome: &'a Outcome,
    pub quiz: &'a Quiz,
    pub time_spent: i64,
    /// Results the user had before this submission.
    pub prior_results: i64,
}

/// Aggregate history including the submission being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub completed: i64,
    /// Points held before this submission.
    pub points_before: i64,
    pub total_points: i64,
    /// Consecutive passing results, newest first.
    pub streak: i64,
}

impl HistorySnapshot {
    /// Builds the snapshot as it will look once `outcome` is recorded.
    ///
    /// `history` must be ordered newest first.
    pub fn after_submission(points_before: i64, history: &[QuizResult], outcome: &Outcome) -> Self {
        let passing = |percentage: i64| percentage >= STREAK_PASS_PERCENTAGE;

        let streak = if passing(outcome.percentage) {
            1 + history.iter().take_while(|r| passing(r.percentage)).count() as i64
        } else {
            0
        };

        Self {
            completed: history.len() as i64 + 1,
            points_before,
            total_points: points_before + outcome.points_earned,
            streak,
        }
    }
}

/// Decides which badges a submission earns, against an injected catalog.
pub struct BadgeEvaluator<'a> {
    catalog: &'a BadgeCatalog,
}

impl<'a> BadgeEvaluator<'a> {
    pub fn new(catalog: &'a BadgeCatalog) -> Self {
        Self { catalog }
    }

    /// Rules decidable from the submission alone: perfect score, speed,
    /// first completion and subject mastery.
    pub fn evaluate_submission(&self, ctx: &SubmissionContext<'_>) -> Vec<BadgeDefinition> {
        let title = ctx.quiz.title.to_lowercase();

        self.collect(|requirement| match requirement {
            Requirement::PerfectScore => ctx.outcome.percentage == 100,
            Requirement::Speed { under_secs } => ctx.time_spent < *under_secs,
            Requirement::QuizzesCompleted { count } => *count == 1 && ctx.prior_results == 0,
            Requirement::SpecificQuiz { keyword, min_percentage } => {
                ctx.outcome.percentage >= *min_percentage
                    && title.contains(&keyword.to_lowercase())
            }
            Requirement::TotalPoints { .. } | Requirement::Streak { .. } => false,
        })
    }

    /// Rules that need the user's whole history: completion milestones,
    /// point totals and streaks. Each fires only on the submission that
    /// reaches its threshold.
    pub fn evaluate_history(&self, snapshot: &HistorySnapshot) -> Vec<BadgeDefinition> {
        self.collect(|requirement| match requirement {
            Requirement::QuizzesCompleted { count } => snapshot.completed == *count,
            Requirement::TotalPoints { points } => {
                snapshot.points_before < *points && snapshot.total_points >= *points
            }
            Requirement::Streak { count } => snapshot.streak == *count,
            _ => false,
        })
    }

    /// Unions two evaluations, keeping catalog order and one entry per name.
    pub fn merge(&self, first: Vec<BadgeDefinition>, second: Vec<BadgeDefinition>) -> Vec<BadgeDefinition> {
        let names: HashSet<String> = first.into_iter().chain(second).map(|b| b.name).collect();
        self.collect_where(|badge| names.contains(&badge.name))
    }

    fn collect(&self, rule: impl Fn(&Requirement) -> bool) -> Vec<BadgeDefinition> {
        self.collect_where(|badge| rule(&badge.requirement))
    }

    fn collect_where(&self, keep: impl Fn(&BadgeDefinition) -> bool) -> Vec<BadgeDefinition> {
        let mut seen = HashSet::new();
        self.catalog
            .badges()
            .iter()
            .filter(|badge| keep(badge) && seen.insert(badge.name.as_str()))
            .cloned()
            .collect()
    }
}
