// src/exam/assembler.rs

use std::sync::Arc;

use crate::{
    error::AppError,
    exam::config::{ExamConfig, MinutesPerQuestion, TypeCounts},
    models::{exam::ExamPayload, question::QuestionType},
    repo::QuestionRepository,
};

/// Flat allowance added to every recomputed duration, covering final
/// review time.
pub const REVIEW_BUFFER_MINUTES: f64 = 2.0;

/// Estimated duration for the given per-type question counts, in whole
/// minutes: per-question pacing summed up, plus the review buffer,
/// rounded up.
pub fn estimate_duration(counts: &TypeCounts, minutes: &MinutesPerQuestion) -> u32 {
    let answering: f64 = QuestionType::ALL
        .iter()
        .map(|&question_type| counts.get(question_type) as f64 * minutes.get(question_type))
        .sum();
    (answering + REVIEW_BUFFER_MINUTES).ceil() as u32
}

/// Assembles random exams from the question bank under per-subject quotas.
///
/// Stateless apart from its injected collaborators; safe to share and to
/// call concurrently.
pub struct ExamAssembler {
    repo: Arc<dyn QuestionRepository>,
    config: Arc<ExamConfig>,
}

impl ExamAssembler {
    pub fn new(repo: Arc<dyn QuestionRepository>, config: Arc<ExamConfig>) -> Self {
        Self { repo, config }
    }

    /// Draws a random exam for the subject.
    ///
    /// Per type (fixed order: multiple choice, true/false, short answer) a
    /// random sample of the quota size is requested; a bank holding fewer
    /// questions yields what it has. When the total draw falls short of
    /// the total quota the exam is marked `is_full_exam: false` and its
    /// duration is recomputed from the actual per-type counts, so a thin
    /// bank never produces a full-length timer over fewer questions.
    ///
    /// Fails with `SubjectNotFound` for an unknown subject key and
    /// `EmptyQuestionBank` when nothing could be drawn at all. Shortfall
    /// itself is not an error.
    pub async fn assemble_random_exam(&self, subject_key: &str) -> Result<ExamPayload, AppError> {
        let subject = self
            .repo
            .find_subject(subject_key)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(subject_key.to_string()))?;

        let quota_config = self.config.get_quota(&subject.key);

        let mut questions = Vec::new();
        let mut actual = TypeCounts::default();
        for question_type in QuestionType::ALL {
            let requested = quota_config.quota.get(question_type);
            if requested == 0 {
                // Requesting zero of a type is legitimate, not shortfall.
                continue;
            }

            let drawn = self
                .repo
                .sample_questions(subject.id, question_type, requested)
                .await?;
            actual.set(question_type, drawn.len() as u32);
            questions.extend(drawn);
        }

        if questions.is_empty() {
            return Err(AppError::EmptyQuestionBank(subject.key));
        }

        let requested_total = quota_config.quota.total();
        let actual_total = actual.total();

        let (title, duration_minutes, is_full_exam) = if actual_total == requested_total {
            (
                format!("Random exam — {}", subject.name),
                quota_config.duration_minutes,
                true,
            )
        } else {
            // Shortfall is judged on the summed totals, not per type.
            let minutes = self.config.get_minutes_per_question(&subject.key);
            let duration_minutes = estimate_duration(&actual, minutes);
            tracing::warn!(
                "Question bank shortfall for subject '{}': drew {} of {} requested",
                subject.key,
                actual_total,
                requested_total
            );
            (
                format!("Shortened practice exam ({} questions)", actual_total),
                duration_minutes,
                false,
            )
        };

        Ok(ExamPayload {
            title,
            duration_minutes,
            total_questions: actual_total,
            is_full_exam,
            questions: questions.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::config::SubjectQuota;
    use crate::models::question::{ChoiceOptions, Clause, Question, QuestionBody};
    use crate::models::subject::Subject;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// In-memory bank: a subject per entry, with a stocked question count
    /// per type. Sampling truncates in insertion order; only the size and
    /// the filter are contractual.
    struct FakeRepo {
        subjects: Vec<Subject>,
        questions: Vec<Question>,
    }

    impl FakeRepo {
        fn new(subject_key: &str, stock: &[(QuestionType, u32)]) -> Self {
            let subject = Subject {
                id: 1,
                key: subject_key.to_string(),
                name: subject_key.to_string(),
            };
            let mut questions = Vec::new();
            let mut next_id = 1;
            for &(question_type, count) in stock {
                for _ in 0..count {
                    questions.push(make_question(next_id, question_type));
                    next_id += 1;
                }
            }
            Self {
                subjects: vec![subject],
                questions,
            }
        }
    }

    fn make_question(id: i64, question_type: QuestionType) -> Question {
        let body = match question_type {
            QuestionType::MultipleChoice => QuestionBody::MultipleChoice {
                options: ChoiceOptions {
                    a: "A".to_string(),
                    b: "B".to_string(),
                    c: "C".to_string(),
                    d: "D".to_string(),
                },
                correct_answer: "A".to_string(),
            },
            QuestionType::TrueFalse => QuestionBody::TrueFalse {
                clauses: vec![Clause {
                    clause_id: "c1".to_string(),
                    text: "Clause".to_string(),
                    is_correct: true,
                }],
            },
            QuestionType::ShortAnswer => QuestionBody::ShortAnswer {
                correct_value: "42".to_string(),
            },
        };
        Question {
            id,
            subject_id: 1,
            content: format!("Question {}", id),
            body,
        }
    }

    #[async_trait]
    impl QuestionRepository for FakeRepo {
        async fn find_subject(&self, key: &str) -> Result<Option<Subject>, AppError> {
            Ok(self.subjects.iter().find(|s| s.key == key).cloned())
        }

        async fn find_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError> {
            Ok(self
                .questions
                .iter()
                .filter(|q| ids.contains(&q.id))
                .cloned()
                .collect())
        }

        async fn sample_questions(
            &self,
            subject_id: i64,
            question_type: QuestionType,
            n: u32,
        ) -> Result<Vec<Question>, AppError> {
            Ok(self
                .questions
                .iter()
                .filter(|q| q.subject_id == subject_id && q.question_type() == question_type)
                .take(n as usize)
                .cloned()
                .collect())
        }
    }

    fn math_config() -> Arc<ExamConfig> {
        let mut quotas = HashMap::new();
        quotas.insert(
            "math".to_string(),
            SubjectQuota {
                duration_minutes: 45,
                quota: TypeCounts {
                    multiple_choice: 12,
                    true_false: 4,
                    short_answer: 4,
                },
            },
        );
        let mut minutes_per_question = HashMap::new();
        minutes_per_question.insert(
            "math".to_string(),
            MinutesPerQuestion {
                multiple_choice: 1.5,
                true_false: 4.0,
                short_answer: 3.0,
            },
        );
        Arc::new(ExamConfig {
            quotas,
            minutes_per_question,
            ..ExamConfig::builtin()
        })
    }

    fn assembler(repo: FakeRepo, config: Arc<ExamConfig>) -> ExamAssembler {
        ExamAssembler::new(Arc::new(repo), config)
    }

    #[tokio::test]
    async fn fully_stocked_bank_yields_full_exam() {
        let repo = FakeRepo::new(
            "math",
            &[
                (QuestionType::MultipleChoice, 20),
                (QuestionType::TrueFalse, 10),
                (QuestionType::ShortAnswer, 10),
            ],
        );
        let exam = assembler(repo, math_config())
            .assemble_random_exam("math")
            .await
            .unwrap();

        assert!(exam.is_full_exam);
        assert_eq!(exam.total_questions, 20);
        assert_eq!(exam.questions.len(), 20);
        assert_eq!(exam.duration_minutes, 45);
        assert_eq!(exam.title, "Random exam — math");

        // Fixed type ordering: all multiple choice first, then true/false,
        // then short answer.
        let types: Vec<QuestionType> = exam.questions.iter().map(|q| q.question_type).collect();
        let mc = types
            .iter()
            .filter(|&&t| t == QuestionType::MultipleChoice)
            .count();
        assert!(
            types[..mc].iter().all(|&t| t == QuestionType::MultipleChoice),
            "multiple choice block must come first"
        );
        assert_eq!(types.last(), Some(&QuestionType::ShortAnswer));
    }

    #[tokio::test]
    async fn shortfall_rescales_duration_from_actual_counts() {
        // Scenario D: only 8 of 12 multiple-choice questions in the bank,
        // full counts otherwise.
        let repo = FakeRepo::new(
            "math",
            &[
                (QuestionType::MultipleChoice, 8),
                (QuestionType::TrueFalse, 10),
                (QuestionType::ShortAnswer, 10),
            ],
        );
        let exam = assembler(repo, math_config())
            .assemble_random_exam("math")
            .await
            .unwrap();

        assert!(!exam.is_full_exam);
        assert_eq!(exam.total_questions, 8 + 4 + 4);
        assert_eq!(exam.title, "Shortened practice exam (16 questions)");
        // 8*1.5 + 4*4.0 + 4*3.0 + 2.0 buffer = 42.
        assert_eq!(exam.duration_minutes, 42);
    }

    #[tokio::test]
    async fn zero_quota_type_is_not_shortfall() {
        let mut quotas = HashMap::new();
        quotas.insert(
            "history".to_string(),
            SubjectQuota {
                duration_minutes: 30,
                quota: TypeCounts {
                    multiple_choice: 5,
                    true_false: 2,
                    short_answer: 0,
                },
            },
        );
        let config = Arc::new(ExamConfig {
            quotas,
            ..ExamConfig::builtin()
        });

        // No short-answer questions stocked, but none requested either.
        let repo = FakeRepo::new(
            "history",
            &[
                (QuestionType::MultipleChoice, 5),
                (QuestionType::TrueFalse, 2),
            ],
        );
        let exam = assembler(repo, config)
            .assemble_random_exam("history")
            .await
            .unwrap();

        assert!(exam.is_full_exam);
        assert_eq!(exam.total_questions, 7);
        assert_eq!(exam.duration_minutes, 30);
    }

    #[tokio::test]
    async fn unconfigured_subject_falls_back_to_default_quota() {
        // Scenario F: the subject exists in the bank but has no quota
        // entry; the default (12/4/4 over 45 minutes) applies.
        let repo = FakeRepo::new(
            "geography",
            &[
                (QuestionType::MultipleChoice, 12),
                (QuestionType::TrueFalse, 4),
                (QuestionType::ShortAnswer, 4),
            ],
        );
        let exam = assembler(repo, Arc::new(ExamConfig::builtin()))
            .assemble_random_exam("geography")
            .await
            .unwrap();

        assert!(exam.is_full_exam);
        assert_eq!(exam.total_questions, 20);
        assert_eq!(exam.duration_minutes, 45);
    }

    #[tokio::test]
    async fn unknown_subject_fails_with_subject_not_found() {
        let repo = FakeRepo::new("math", &[(QuestionType::MultipleChoice, 5)]);
        let err = assembler(repo, math_config())
            .assemble_random_exam("alchemy")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::SubjectNotFound(ref s) if s == "alchemy"));
    }

    #[tokio::test]
    async fn empty_bank_fails_with_empty_question_bank() {
        let repo = FakeRepo::new("math", &[]);
        let err = assembler(repo, math_config())
            .assemble_random_exam("math")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::EmptyQuestionBank(_)));
    }

    #[tokio::test]
    async fn exam_questions_carry_no_answers() {
        let repo = FakeRepo::new(
            "math",
            &[
                (QuestionType::MultipleChoice, 12),
                (QuestionType::TrueFalse, 4),
                (QuestionType::ShortAnswer, 4),
            ],
        );
        let exam = assembler(repo, math_config())
            .assemble_random_exam("math")
            .await
            .unwrap();

        let value = serde_json::to_value(&exam).unwrap();
        for question in value["questions"].as_array().unwrap() {
            assert!(question.get("correct_answer").is_none());
            assert!(question.get("correct_value").is_none());
            if let Some(clauses) = question.get("clauses") {
                for clause in clauses.as_array().unwrap() {
                    assert!(clause.get("is_correct").is_none());
                }
            }
        }
    }

    #[test]
    fn duration_estimate_rounds_up_and_adds_buffer() {
        let counts = TypeCounts {
            multiple_choice: 3,
            true_false: 1,
            short_answer: 1,
        };
        let minutes = MinutesPerQuestion {
            multiple_choice: 1.5,
            true_false: 4.0,
            short_answer: 2.5,
        };
        // 4.5 + 4.0 + 2.5 + 2.0 = 13.0 exactly.
        assert_eq!(estimate_duration(&counts, &minutes), 13);

        let minutes = MinutesPerQuestion {
            multiple_choice: 1.4,
            true_false: 4.0,
            short_answer: 2.5,
        };
        // 4.2 + 4.0 + 2.5 + 2.0 = 12.7 → 13.
        assert_eq!(estimate_duration(&counts, &minutes), 13);
    }
}
