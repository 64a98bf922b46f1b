// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// One answer as submitted by the client.
///
/// `raw_value` is type-dependent: a single letter for multiple choice, a
/// serialized `{clause_id: bool}` map for true/false, free text for short
/// answer. The scoring engine interprets it against the stored question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    #[validate(length(max = 2000, message = "Answer value too long."))]
    pub raw_value: String,
}

/// One graded answer. `is_correct` is the display flag: for true/false it
/// is true only when every clause was judged correctly, even though
/// partial credit may have been awarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredAnswer {
    pub question_id: i64,
    pub raw_value: String,
    pub is_correct: bool,
}

/// Aggregate result of grading one answer set.
///
/// `normalized_score` is the raw point total rescaled to 0-10 against the
/// maximum achievable for the resolved questions, rounded to 2 decimals.
/// It is exactly 0.0 when nothing could be graded (`max_possible == 0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptAggregate {
    pub raw_score: f64,
    pub max_possible: f64,
    pub normalized_score: f64,
}

/// Represents the 'attempts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub subject_id: i64,
    pub raw_score: f64,
    pub max_possible: f64,
    pub normalized_score: f64,
    pub total_questions: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting an answer set for scoring.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAttemptRequest {
    #[validate(length(min = 1, max = 100, message = "Subject key must not be empty."))]
    pub subject: String,
    #[validate(nested)]
    pub answers: Vec<SubmittedAnswer>,
}

/// DTO for the created attempt, returned to the client.
#[derive(Debug, Serialize)]
pub struct AttemptResponse {
    #[serde(flatten)]
    pub attempt: Attempt,
    pub answers: Vec<ScoredAnswer>,
}
