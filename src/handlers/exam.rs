// src/handlers/exam.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{error::AppError, exam::assembler::ExamAssembler, models::exam::RandomExamRequest};

/// Assembles a random exam for the requested subject.
///
/// * Resolves the subject (404 when unknown).
/// * Draws per-type random samples under the subject's quota.
/// * On shortfall, returns `is_full_exam: false` with a rescaled duration
///   so the client can warn the student; an entirely empty bank is a 400.
pub async fn generate_random_exam(
    State(assembler): State<Arc<ExamAssembler>>,
    Json(payload): Json<RandomExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let exam = assembler.assemble_random_exam(&payload.subject).await?;

    Ok(Json(exam))
}
