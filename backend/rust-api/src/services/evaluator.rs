//! Answer evaluation.
//!
//! [`evaluate`] is pure: it decides correctness and whether the check counts
//! as a new attempt, but never reads or writes storage. Persisting the
//! outcome is the job of [`super::answer_service::AnswerService`].

use serde::Serialize;

use crate::models::progress::AttemptRecord;
use crate::models::question::{AnswerKey, ComparableResponse, Question, SubmittedResponse};

/// Why an evaluation did or did not produce a new attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// The problem was already solved; nothing was compared.
    Locked,
    /// Same response as the last recorded one in this visit.
    Suppressed,
    /// A new attempt must be persisted.
    Recorded,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Locked => "locked",
            Disposition::Suppressed => "suppressed",
            Disposition::Recorded => "recorded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOutcome {
    pub is_correct: bool,
    pub attempt_recorded: bool,
    /// Counter after this evaluation; unchanged unless `attempt_recorded`.
    pub new_attempts_count: u32,
    pub disposition: Disposition,
    /// Memo value to store once the attempt has been persisted.
    pub comparable: ComparableResponse,
}

pub fn evaluate(
    question: &Question,
    response: &SubmittedResponse,
    prior: Option<&AttemptRecord>,
    last_memo: Option<&ComparableResponse>,
) -> EvaluationOutcome {
    let prior_count = prior.map(|record| record.attempts_count).unwrap_or(0);
    let comparable = response.comparable();

    if prior.is_some_and(|record| record.is_correct) {
        return EvaluationOutcome {
            is_correct: true,
            attempt_recorded: false,
            new_attempts_count: prior_count,
            disposition: Disposition::Locked,
            comparable,
        };
    }

    if last_memo == Some(&comparable) {
        return EvaluationOutcome {
            is_correct: prior.is_some_and(|record| record.is_correct),
            attempt_recorded: false,
            new_attempts_count: prior_count,
            disposition: Disposition::Suppressed,
            comparable,
        };
    }

    EvaluationOutcome {
        is_correct: is_correct(&question.answer, response),
        attempt_recorded: true,
        new_attempts_count: prior_count.saturating_add(1),
        disposition: Disposition::Recorded,
        comparable,
    }
}

/// Type-specific comparison. A response whose shape does not fit the answer is wrong.
pub fn is_correct(answer: &AnswerKey, response: &SubmittedResponse) -> bool {
    match (answer, response) {
        // Lowercase only; surrounding whitespace is significant.
        (AnswerKey::Input(expected), SubmittedResponse::Text(given)) => {
            given.to_lowercase() == expected.to_lowercase()
        }
        (AnswerKey::SingleChoice(expected), SubmittedResponse::Text(given)) => given == expected,
        (AnswerKey::MultiChoiceMultiAnswer(expected), SubmittedResponse::Selection(given)) => {
            let mut expected = expected.clone();
            let mut given = given.clone();
            expected.sort();
            given.sort();
            given.len() == expected.len() && given.iter().zip(&expected).all(|(a, b)| a == b)
        }
        (AnswerKey::CategorizedChoice(expected), SubmittedResponse::Categorized(given)) => {
            given == expected
        }
        _ => false,
    }
}
