// src/repo/mod.rs

pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        attempt::{Attempt, AttemptAggregate, ScoredAnswer},
        question::{Question, QuestionType},
        subject::Subject,
    },
};

pub use postgres::{PgAttemptStore, PgQuestionRepository};

/// Read-only access to the question bank.
///
/// The engine treats questions as immutable and batches its lookups: one
/// by-ids fetch per scoring call, one sample per (subject, type) during
/// assembly.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn find_subject(&self, key: &str) -> Result<Option<Subject>, AppError>;

    /// Batch lookup by id. Unknown ids are simply absent from the result.
    async fn find_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError>;

    /// Random sample without replacement of up to `n` questions matching
    /// (subject, type). Returns fewer when the bank holds fewer.
    async fn sample_questions(
        &self,
        subject_id: i64,
        question_type: QuestionType,
        n: u32,
    ) -> Result<Vec<Question>, AppError>;
}

/// Persistence for scored attempts.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Stores the attempt with its per-answer rows and returns the created
    /// record.
    async fn insert_attempt(
        &self,
        subject_id: i64,
        aggregate: &AttemptAggregate,
        answers: &[ScoredAnswer],
    ) -> Result<Attempt, AppError>;
}
