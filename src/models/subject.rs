// src/models/subject.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents the 'subjects' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,

    /// Stable lookup key used in API requests and configuration tables
    /// (e.g., "math").
    pub key: String,

    /// Human-readable display name (e.g., "Mathematics").
    pub name: String,
}
