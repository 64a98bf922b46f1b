// src/exam/scoring.rs

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{
        attempt::{AttemptAggregate, ScoredAnswer, SubmittedAnswer},
        question::{Question, QuestionBody, QuestionType},
    },
    repo::QuestionRepository,
};

/// Fixed point value of a multiple-choice question.
pub const MULTIPLE_CHOICE_POINTS: f64 = 0.25;
/// Fixed point value of a short-answer question.
pub const SHORT_ANSWER_POINTS: f64 = 0.5;
/// Maximum point value of a true/false question (all clauses correct).
pub const TRUE_FALSE_MAX_POINTS: f64 = 1.0;

/// Maximum achievable points for one question of the given type.
fn max_points(question_type: QuestionType) -> f64 {
    match question_type {
        QuestionType::MultipleChoice => MULTIPLE_CHOICE_POINTS,
        QuestionType::TrueFalse => TRUE_FALSE_MAX_POINTS,
        QuestionType::ShortAnswer => SHORT_ANSWER_POINTS,
    }
}

/// Progressive credit for true/false questions by number of correctly
/// judged clauses. The steps are a fixed lookup, not a linear scale.
fn true_false_points(matching_clauses: usize) -> f64 {
    match matching_clauses {
        1 => 0.1,
        2 => 0.25,
        3 => 0.5,
        4 => 1.0,
        _ => 0.0,
    }
}

/// Canonical form for short-answer comparison: trimmed, decimal comma
/// folded to a point, lowercased.
fn normalize_short_answer(value: &str) -> String {
    value.trim().replace(',', ".").to_lowercase()
}

/// Compares a submitted short answer against the stored correct value.
///
/// When both normalized values parse as numbers they are compared
/// numerically, so "2,5" matches "2.50". Otherwise the normalized strings
/// are compared directly.
fn short_answer_matches(submitted: &str, correct: &str) -> bool {
    let submitted = normalize_short_answer(submitted);
    let correct = normalize_short_answer(correct);

    if let (Ok(a), Ok(b)) = (submitted.parse::<f64>(), correct.parse::<f64>()) {
        return a == b;
    }
    submitted == correct
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Grades a single answer against its resolved question.
/// Returns the awarded points and the display correctness flag.
fn grade_answer(question: &Question, raw_value: &str) -> (f64, bool) {
    match &question.body {
        QuestionBody::MultipleChoice { correct_answer, .. } => {
            let is_correct = raw_value == correct_answer.as_str();
            let points = if is_correct { MULTIPLE_CHOICE_POINTS } else { 0.0 };
            (points, is_correct)
        }
        QuestionBody::TrueFalse { clauses } => {
            // Malformed submissions count as an empty map: every clause is
            // judged wrong, nothing crashes.
            let submitted: HashMap<String, bool> =
                serde_json::from_str(raw_value).unwrap_or_default();

            let matching = clauses
                .iter()
                .filter(|clause| submitted.get(&clause.clause_id) == Some(&clause.is_correct))
                .count();

            let points = true_false_points(matching);
            // The display flag only turns on for a fully correct judgement,
            // even though partial credit was awarded.
            let is_correct = !clauses.is_empty() && matching == clauses.len();
            (points, is_correct)
        }
        QuestionBody::ShortAnswer { correct_value } => {
            let is_correct = short_answer_matches(raw_value, correct_value);
            let points = if is_correct { SHORT_ANSWER_POINTS } else { 0.0 };
            (points, is_correct)
        }
    }
}

/// Grades an ordered answer set against already-resolved questions.
///
/// Answers whose `question_id` is missing from `questions` are skipped
/// entirely: they contribute to neither `raw_score` nor `max_possible` and
/// produce no output entry. Unresolved references never penalize.
pub fn grade_answers(
    answers: &[SubmittedAnswer],
    questions: &HashMap<i64, Question>,
) -> (AttemptAggregate, Vec<ScoredAnswer>) {
    let mut raw_score = 0.0;
    let mut max_possible = 0.0;
    let mut scored = Vec::new();

    for answer in answers {
        let Some(question) = questions.get(&answer.question_id) else {
            tracing::debug!(
                "Skipping answer for unknown question {}",
                answer.question_id
            );
            continue;
        };

        max_possible += max_points(question.question_type());
        let (points, is_correct) = grade_answer(question, &answer.raw_value);
        raw_score += points;

        scored.push(ScoredAnswer {
            question_id: answer.question_id,
            raw_value: answer.raw_value.clone(),
            is_correct,
        });
    }

    let normalized_score = if max_possible > 0.0 {
        round2(raw_score / max_possible * 10.0)
    } else {
        0.0
    };

    (
        AttemptAggregate {
            raw_score,
            max_possible,
            normalized_score,
        },
        scored,
    )
}

/// The scoring engine: one batched repository lookup, then pure grading.
///
/// Side-effect free and safe to call concurrently; only a repository
/// failure propagates, in which case no partial aggregate is returned.
pub struct ScoringEngine {
    repo: Arc<dyn QuestionRepository>,
}

impl ScoringEngine {
    pub fn new(repo: Arc<dyn QuestionRepository>) -> Self {
        Self { repo }
    }

    pub async fn score(
        &self,
        answers: &[SubmittedAnswer],
    ) -> Result<(AttemptAggregate, Vec<ScoredAnswer>), AppError> {
        let ids: Vec<i64> = answers.iter().map(|a| a.question_id).collect();

        let questions = if ids.is_empty() {
            Vec::new()
        } else {
            self.repo.find_questions_by_ids(&ids).await?
        };

        let by_id: HashMap<i64, Question> =
            questions.into_iter().map(|q| (q.id, q)).collect();

        Ok(grade_answers(answers, &by_id))
    }
}
