// src/models/exam.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::PublicQuestion;

/// DTO for requesting a randomly assembled exam.
#[derive(Debug, Deserialize, Validate)]
pub struct RandomExamRequest {
    #[validate(length(min = 1, max = 100, message = "Subject key must not be empty."))]
    pub subject: String,
}

/// A randomly assembled exam, ready to present to the student.
///
/// `is_full_exam` is false when the question bank could not satisfy the
/// full quota; in that case `duration_minutes` has been recomputed from
/// the actually drawn per-type counts so pacing stays honest, and the
/// caller is expected to warn the student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamPayload {
    pub title: String,
    pub duration_minutes: u32,
    pub total_questions: u32,
    pub is_full_exam: bool,
    pub questions: Vec<PublicQuestion>,
}
