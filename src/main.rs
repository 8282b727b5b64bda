// src/main.rs

use dotenvy::dotenv;
use edugamify::config::Config;
use edugamify::routes;
use edugamify::seed::seed_quizzes;
use edugamify::services::badges::BadgeCatalog;
use edugamify::state::AppState;
use edugamify::store::{MemoryStore, PgStore};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let badges = load_badge_catalog(&config)?;

    let state = match &config.database_url {
        Some(database_url) => {
            let pool = connect_with_retry(database_url).await?;

            // Run Migrations Automatically
            tracing::info!("Running migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations applied successfully.");

            AppState::new(Arc::new(PgStore::new(pool)), config.clone(), badges)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store. Data is lost on restart.");
            AppState::new(Arc::new(MemoryStore::new()), config.clone(), badges)
        }
    };

    if config.seed_quizzes {
        if let Err(e) = seed_quizzes(state.quizzes.as_ref()).await {
            tracing::error!("Failed to seed sample quizzes: {:?}", e);
        }
    }

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects to Postgres, retrying while the database comes up.
async fn connect_with_retry(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!("Database connected...");
                return Ok(pool);
            }
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to connect to database after 5 retries: {}", e);
                    return Err(e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

fn load_badge_catalog(config: &Config) -> Result<BadgeCatalog, Box<dyn Error>> {
    match &config.badge_catalog_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let catalog = BadgeCatalog::from_json(&raw)?;
            tracing::info!("Loaded {} badges from {}", catalog.badges().len(), path);
            Ok(catalog)
        }
        None => Ok(BadgeCatalog::standard()),
    }
}
