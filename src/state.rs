// src/state.rs

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;

use crate::{
    config::{Config, LEDGER_MAX_RETRIES},
    services::{badges::BadgeCatalog, ledger::Ledger},
    store::{LedgerWriter, QuizCatalog, ResultStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub quizzes: Arc<dyn QuizCatalog>,
    pub users: Arc<dyn UserStore>,
    pub results: Arc<dyn ResultStore>,
    pub ledger: Ledger,
    pub badges: Arc<BadgeCatalog>,
}

impl AppState {
    /// Wires every store seam to one backend.
    pub fn new<S>(store: Arc<S>, config: Config, badges: BadgeCatalog) -> Self
    where
        S: QuizCatalog + UserStore + ResultStore + LedgerWriter + 'static,
    {
        let ledger = Ledger::new(
            store.clone(),
            LEDGER_MAX_RETRIES,
            Duration::from_secs(config.submission_timeout_secs),
        );

        Self {
            config,
            quizzes: store.clone(),
            users: store.clone(),
            results: store,
            ledger,
            badges: Arc::new(badges),
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
