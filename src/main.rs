// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use exam_backend::config::Config;
use exam_backend::exam::{assembler::ExamAssembler, config::ExamConfig, scoring::ScoringEngine};
use exam_backend::repo::{PgAttemptStore, PgQuestionRepository};
use exam_backend::routes;
use exam_backend::state::AppState;

#[tokio::main]
async fn main() {
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

    // Load the exam tables (built-in defaults unless overridden)
    let exam_config = match &config.exam_config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("Failed to read exam config '{}': {}", path, e));
            let parsed: ExamConfig = serde_json::from_str(&raw)
                .unwrap_or_else(|e| panic!("Failed to parse exam config '{}': {}", path, e));
            tracing::info!("Loaded exam configuration from {}", path);
            parsed
        }
        None => ExamConfig::builtin(),
    };

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Wire the engine to its Postgres collaborators
    let questions = Arc::new(PgQuestionRepository::new(pool.clone()));
    let attempts = Arc::new(PgAttemptStore::new(pool));
    let exam_config = Arc::new(exam_config);

    let state = AppState {
        config: config.clone(),
        questions: questions.clone(),
        attempts,
        assembler: Arc::new(ExamAssembler::new(questions.clone(), exam_config)),
        scoring: Arc::new(ScoringEngine::new(questions)),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
