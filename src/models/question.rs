// src/models/question.rs

use serde::{Deserialize, Serialize};

/// The three supported question types.
///
/// Serialized in snake_case both in the API and in the `questions.type`
/// column. Legacy rows may carry a NULL or unknown type; those are treated
/// as `multiple_choice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionType {
    /// Fixed presentation order: multiple choice first, then true/false,
    /// then short answer. Exam assembly concatenates drawn questions in
    /// this order.
    pub const ALL: [QuestionType; 3] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::ShortAnswer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
        }
    }

    /// Parses a stored type value, defaulting to `multiple_choice` for
    /// NULL or unrecognized values (legacy data).
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("true_false") => QuestionType::TrueFalse,
            Some("short_answer") => QuestionType::ShortAnswer,
            _ => QuestionType::MultipleChoice,
        }
    }
}

/// The four fixed answer options of a multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

/// One sub-statement of a true/false question, judged individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clause {
    pub clause_id: String,
    pub text: String,
    pub is_correct: bool,
}

/// Type-specific question payload, stored as JSONB in `questions.payload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QuestionBody {
    MultipleChoice {
        options: ChoiceOptions,
        correct_answer: String,
    },
    TrueFalse {
        clauses: Vec<Clause>,
    },
    ShortAnswer {
        correct_value: String,
    },
}

impl QuestionBody {
    /// Parses a JSONB payload according to the row's declared type.
    ///
    /// The `type` column, not the payload shape, decides the variant, so a
    /// payload that doesn't fit its declared type is an error the caller
    /// must handle (the repository skips such rows with a warning).
    pub fn from_payload(
        question_type: QuestionType,
        payload: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        match question_type {
            QuestionType::MultipleChoice => {
                #[derive(Deserialize)]
                struct Payload {
                    options: ChoiceOptions,
                    correct_answer: String,
                }
                let p: Payload = serde_json::from_value(payload)?;
                Ok(QuestionBody::MultipleChoice {
                    options: p.options,
                    correct_answer: p.correct_answer,
                })
            }
            QuestionType::TrueFalse => {
                #[derive(Deserialize)]
                struct Payload {
                    clauses: Vec<Clause>,
                }
                let p: Payload = serde_json::from_value(payload)?;
                Ok(QuestionBody::TrueFalse { clauses: p.clauses })
            }
            QuestionType::ShortAnswer => {
                #[derive(Deserialize)]
                struct Payload {
                    correct_value: String,
                }
                let p: Payload = serde_json::from_value(payload)?;
                Ok(QuestionBody::ShortAnswer {
                    correct_value: p.correct_value,
                })
            }
        }
    }
}

/// A fully resolved question as the engine sees it: immutable, owned by
/// the question repository.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: i64,
    pub subject_id: i64,
    pub content: String,
    pub body: QuestionBody,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        match self.body {
            QuestionBody::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionBody::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionBody::ShortAnswer { .. } => QuestionType::ShortAnswer,
        }
    }
}

/// A clause as sent to the client: the verdict stays server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicClause {
    pub clause_id: String,
    pub text: String,
}

/// DTO for sending a question to the client.
///
/// Excludes everything that would give the answer away: `correct_answer`,
/// clause verdicts, `correct_value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChoiceOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clauses: Option<Vec<PublicClause>>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        let question_type = q.question_type();
        let (options, clauses) = match q.body {
            QuestionBody::MultipleChoice { options, .. } => (Some(options), None),
            QuestionBody::TrueFalse { clauses } => (
                None,
                Some(
                    clauses
                        .into_iter()
                        .map(|c| PublicClause {
                            clause_id: c.clause_id,
                            text: c.text,
                        })
                        .collect(),
                ),
            ),
            QuestionBody::ShortAnswer { .. } => (None, None),
        };

        PublicQuestion {
            id: q.id,
            question_type,
            content: q.content,
            options,
            clauses,
        }
    }
}
