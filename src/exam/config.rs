// src/exam/config.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::question::QuestionType;

/// A per-type count triple. Used both for configured quotas and for the
/// counts actually drawn during assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub multiple_choice: u32,
    pub true_false: u32,
    pub short_answer: u32,
}

impl TypeCounts {
    pub fn get(&self, question_type: QuestionType) -> u32 {
        match question_type {
            QuestionType::MultipleChoice => self.multiple_choice,
            QuestionType::TrueFalse => self.true_false,
            QuestionType::ShortAnswer => self.short_answer,
        }
    }

    pub fn set(&mut self, question_type: QuestionType, count: u32) {
        match question_type {
            QuestionType::MultipleChoice => self.multiple_choice = count,
            QuestionType::TrueFalse => self.true_false = count,
            QuestionType::ShortAnswer => self.short_answer = count,
        }
    }

    pub fn total(&self) -> u32 {
        self.multiple_choice + self.true_false + self.short_answer
    }
}

/// Structural target for one subject's random exam.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubjectQuota {
    /// Nominal duration when the bank satisfies the full quota.
    pub duration_minutes: u32,
    pub quota: TypeCounts,
}

/// Estimated answering time per question of each type, in minutes.
/// Drives duration recalculation for shortened exams.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MinutesPerQuestion {
    pub multiple_choice: f64,
    pub true_false: f64,
    pub short_answer: f64,
}

impl MinutesPerQuestion {
    pub fn get(&self, question_type: QuestionType) -> f64 {
        match question_type {
            QuestionType::MultipleChoice => self.multiple_choice,
            QuestionType::TrueFalse => self.true_false,
            QuestionType::ShortAnswer => self.short_answer,
        }
    }
}

fn default_quota() -> SubjectQuota {
    SubjectQuota {
        duration_minutes: 45,
        quota: TypeCounts {
            multiple_choice: 12,
            true_false: 4,
            short_answer: 4,
        },
    }
}

fn default_minutes_per_question() -> MinutesPerQuestion {
    MinutesPerQuestion {
        multiple_choice: 1.5,
        true_false: 4.0,
        short_answer: 2.5,
    }
}

/// Read-only exam configuration: per-subject quota and pacing tables,
/// each with a mandatory default entry.
///
/// Lookups never fail: an unconfigured subject resolves to the default
/// entry. Injected into the assembler at construction so environments and
/// tests can override the tables (via `EXAM_CONFIG_PATH` in production).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamConfig {
    #[serde(default)]
    pub quotas: HashMap<String, SubjectQuota>,
    #[serde(default = "default_quota")]
    pub default_quota: SubjectQuota,
    #[serde(default)]
    pub minutes_per_question: HashMap<String, MinutesPerQuestion>,
    #[serde(default = "default_minutes_per_question")]
    pub default_minutes_per_question: MinutesPerQuestion,
}

impl ExamConfig {
    /// The built-in tables, used when no override file is configured.
    pub fn builtin() -> Self {
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
        // History has no short-answer bank; requesting zero of a type is
        // legitimate and never counts as shortfall.
        quotas.insert(
            "history".to_string(),
            SubjectQuota {
                duration_minutes: 40,
                quota: TypeCounts {
                    multiple_choice: 16,
                    true_false: 4,
                    short_answer: 0,
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

        Self {
            quotas,
            default_quota: default_quota(),
            minutes_per_question,
            default_minutes_per_question: default_minutes_per_question(),
        }
    }

    /// Resolves the quota for a subject key, falling back to the default
    /// entry for unconfigured subjects.
    pub fn get_quota(&self, subject_key: &str) -> &SubjectQuota {
        self.quotas.get(subject_key).unwrap_or(&self.default_quota)
    }

    /// Resolves the pacing table for a subject key, falling back to the
    /// default entry for unconfigured subjects.
    pub fn get_minutes_per_question(&self, subject_key: &str) -> &MinutesPerQuestion {
        self.minutes_per_question
            .get(subject_key)
            .unwrap_or(&self.default_minutes_per_question)
    }
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
