// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Number of users shown on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

/// Number of results listed in a progress summary.
pub const RECENT_RESULTS_LIMIT: usize = 5;

/// Attempts made by the ledger after a write conflict before giving up.
pub const LEDGER_MAX_RETRIES: u32 = 3;

/// A result at or above this percentage keeps a streak alive.
pub const STREAK_PASS_PERCENTAGE: i64 = 60;

/// Maximum number of recommended quizzes.
pub const RECOMMENDATION_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When unset the in-memory store is used.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Upper bound for applying one submission to the ledger.
    pub submission_timeout_secs: u64,
    /// Evaluate milestone, points and streak badges at submission time.
    pub history_badges: bool,
    /// Optional JSON file replacing the standard badge catalog.
    pub badge_catalog_path: Option<String>,
    pub seed_quizzes: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7 * 24 * 60 * 60);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        let submission_timeout_secs = env::var("SUBMISSION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let history_badges = env_flag("HISTORY_BADGES", false);
        let seed_quizzes = env_flag("SEED_QUIZZES", true);

        let badge_catalog_path = env::var("BADGE_CATALOG_PATH").ok();

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            submission_timeout_secs,
            history_badges,
            badge_catalog_path,
            seed_quizzes,
        }
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
