// src/repo/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, prelude::FromRow, types::Json};

use crate::{
    error::AppError,
    models::{
        attempt::{Attempt, AttemptAggregate, ScoredAnswer},
        question::{Question, QuestionBody, QuestionType},
        subject::Subject,
    },
    repo::{AttemptStore, QuestionRepository},
};

/// Helper struct for fetching question rows before payload parsing.
#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    subject_id: i64,
    /// Mapped from the database column 'type' since `type` is a reserved
    /// keyword in Rust. NULL on legacy rows.
    #[sqlx(rename = "type")]
    question_type: Option<String>,
    content: String,
    payload: Json<serde_json::Value>,
}

impl QuestionRow {
    /// Parses the JSONB payload for the row's declared type. Rows with a
    /// malformed payload are dropped with a warning rather than failing
    /// the whole lookup.
    fn into_question(self) -> Option<Question> {
        let question_type = QuestionType::parse_or_default(self.question_type.as_deref());
        match QuestionBody::from_payload(question_type, self.payload.0) {
            Ok(body) => Some(Question {
                id: self.id,
                subject_id: self.subject_id,
                content: self.content,
                body,
            }),
            Err(e) => {
                tracing::warn!("Skipping question {} with malformed payload: {}", self.id, e);
                None
            }
        }
    }
}

/// Postgres-backed question bank.
#[derive(Clone)]
pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn find_subject(&self, key: &str) -> Result<Option<Subject>, AppError> {
        let subject =
            sqlx::query_as::<_, Subject>("SELECT id, key, name FROM subjects WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(subject)
    }

    async fn find_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // Use QueryBuilder for dynamic IN clause
        let mut query_builder = sqlx::QueryBuilder::<Postgres>::new(
            "SELECT id, subject_id, type, content, payload FROM questions WHERE id IN (",
        );

        let mut separated = query_builder.separated(",");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows: Vec<QuestionRow> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch questions by ids: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(rows.into_iter().filter_map(QuestionRow::into_question).collect())
    }

    async fn sample_questions(
        &self,
        subject_id: i64,
        question_type: QuestionType,
        n: u32,
    ) -> Result<Vec<Question>, AppError> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, subject_id, type, content, payload
            FROM questions
            WHERE subject_id = $1 AND COALESCE(type, 'multiple_choice') = $2
            ORDER BY RANDOM()
            LIMIT $3
            "#,
        )
        .bind(subject_id)
        .bind(question_type.as_str())
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to sample questions: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(rows.into_iter().filter_map(QuestionRow::into_question).collect())
    }
}

/// Postgres-backed attempt persistence.
#[derive(Clone)]
pub struct PgAttemptStore {
    pool: PgPool,
}

impl PgAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptStore for PgAttemptStore {
    async fn insert_attempt(
        &self,
        subject_id: i64,
        aggregate: &AttemptAggregate,
        answers: &[ScoredAnswer],
    ) -> Result<Attempt, AppError> {
        // Attempt and answer rows land together or not at all.
        let mut tx = self.pool.begin().await?;

        let attempt = sqlx::query_as::<_, Attempt>(
            r#"
            INSERT INTO attempts (subject_id, raw_score, max_possible, normalized_score, total_questions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, subject_id, raw_score, max_possible, normalized_score, total_questions, created_at
            "#,
        )
        .bind(subject_id)
        .bind(aggregate.raw_score)
        .bind(aggregate.max_possible)
        .bind(aggregate.normalized_score)
        .bind(answers.len() as i64)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert attempt: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        for answer in answers {
            sqlx::query(
                r#"
                INSERT INTO attempt_answers (attempt_id, question_id, raw_value, is_correct)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(attempt.id)
            .bind(answer.question_id)
            .bind(&answer.raw_value)
            .bind(answer.is_correct)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(attempt)
    }
}
