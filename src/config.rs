// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,

    /// Optional path to a JSON file overriding the built-in exam
    /// configuration (per-subject quotas and minutes-per-question tables).
    pub exam_config_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let exam_config_path = env::var("EXAM_CONFIG_PATH").ok();

        Self {
            database_url,
            rust_log,
            exam_config_path,
        }
    }
}
