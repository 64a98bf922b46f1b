// src/handlers/attempt.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::attempt::{AttemptResponse, CreateAttemptRequest},
    state::AppState,
};

/// Scores a submitted answer set and persists the attempt.
///
/// * Resolves the subject (404 when unknown).
/// * Grades every answer against the stored questions in one batched
///   lookup; answers referencing unknown questions are silently skipped.
/// * Stores the attempt with its per-answer rows, then returns the created
///   record with the normalized 0-10 score and the scored answer list.
pub async fn create_attempt(
    State(state): State<AppState>,
    Json(payload): Json<CreateAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let subject = state
        .questions
        .find_subject(&payload.subject)
        .await?
        .ok_or_else(|| AppError::SubjectNotFound(payload.subject.clone()))?;

    let (aggregate, scored) = state.scoring.score(&payload.answers).await?;

    let attempt = state
        .attempts
        .insert_attempt(subject.id, &aggregate, &scored)
        .await?;

    tracing::info!(
        "Stored attempt {} for subject '{}': {}/10 over {} questions",
        attempt.id,
        subject.key,
        attempt.normalized_score,
        attempt.total_questions
    );

    Ok((
        StatusCode::CREATED,
        Json(AttemptResponse {
            attempt,
            answers: scored,
        }),
    ))
}
