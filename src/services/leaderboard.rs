// src/services/leaderboard.rs

use serde::Serialize;

use crate::models::user::Standing;

/// Aggregated struct for displaying the leaderboard.
#[derive(Debug, Serialize, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub name: String,
    pub points: i64,
    pub badge_count: i64,
}

/// Orders standings by points descending and keeps the first `limit`.
///
/// The sort is stable, so users with equal points keep the order they were
/// given in (creation order).
pub fn rank(mut standings: Vec<Standing>, limit: usize) -> Vec<LeaderboardEntry> {
    standings.sort_by(|a, b| b.points.cmp(&a.points));

    standings
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, standing)| LeaderboardEntry {
            rank: index + 1,
            name: standing.name,
            points: standing.points,
            badge_count: standing.badge_count,
        })
        .collect()
}
