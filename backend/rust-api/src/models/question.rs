use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Question-type discriminator as stored in the `type` field of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "input")]
    Input,
    #[serde(rename = "mcq")]
    SingleChoice,
    #[serde(rename = "mcma")]
    MultiChoiceMultiAnswer,
    #[serde(rename = "mck")]
    CategorizedChoice,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Input => "input",
            QuestionKind::SingleChoice => "mcq",
            QuestionKind::MultiChoiceMultiAnswer => "mcma",
            QuestionKind::CategorizedChoice => "mck",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(QuestionKind::Input),
            "mcq" => Ok(QuestionKind::SingleChoice),
            "mcma" => Ok(QuestionKind::MultiChoiceMultiAnswer),
            "mck" => Ok(QuestionKind::CategorizedChoice),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown question kind {0:?}")]
pub struct UnknownKind(pub String);

/// Content-authoring defects detected while turning a stored problem into a [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("problem {problem_id} has unrecognized question kind {kind:?}")]
    MalformedQuestion { problem_id: String, kind: String },
}

/// Problem as stored in the `problems` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDocument {
    #[serde(rename = "_id")]
    pub problem_id: String,
    pub subtopic_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    /// Raw kind string; validated by [`Question::from_document`].
    #[serde(rename = "type")]
    pub kind: String,
    pub question_text: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub answer_categories: Vec<String>,
    /// Either a structured value or, for `mcma`/`mck`, a JSON-encoded string.
    #[serde(default)]
    pub answer: Value,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Authoritative answer, one variant per question kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Input(String),
    SingleChoice(String),
    MultiChoiceMultiAnswer(Vec<String>),
    CategorizedChoice(BTreeMap<String, String>),
}

impl AnswerKey {
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerKey::Input(_) => QuestionKind::Input,
            AnswerKey::SingleChoice(_) => QuestionKind::SingleChoice,
            AnswerKey::MultiChoiceMultiAnswer(_) => QuestionKind::MultiChoiceMultiAnswer,
            AnswerKey::CategorizedChoice(_) => QuestionKind::CategorizedChoice,
        }
    }

    /// Decodes a stored answer payload for `kind`.
    ///
    /// Never fails: a payload that does not fit the kind's shape is logged and
    /// replaced by an empty answer, which no complete response can match.
    pub fn decode(kind: QuestionKind, raw: &Value, problem_id: &str) -> Self {
        match kind {
            QuestionKind::Input => AnswerKey::Input(decode_text(raw, kind, problem_id)),
            QuestionKind::SingleChoice => {
                AnswerKey::SingleChoice(decode_text(raw, kind, problem_id))
            }
            QuestionKind::MultiChoiceMultiAnswer => {
                let keys = decode_structured::<Vec<String>>(raw).unwrap_or_else(|| {
                    tracing::warn!(
                        "Malformed stored answer for problem {} ({}), treating as empty",
                        problem_id,
                        kind
                    );
                    Vec::new()
                });
                AnswerKey::MultiChoiceMultiAnswer(keys)
            }
            QuestionKind::CategorizedChoice => {
                let mapping =
                    decode_structured::<BTreeMap<String, String>>(raw).unwrap_or_else(|| {
                        tracing::warn!(
                            "Malformed stored answer for problem {} ({}), treating as empty",
                            problem_id,
                            kind
                        );
                        BTreeMap::new()
                    });
                AnswerKey::CategorizedChoice(mapping)
            }
        }
    }

    /// Human-readable form shown once a problem is solved.
    pub fn display(&self) -> String {
        match self {
            AnswerKey::Input(text) | AnswerKey::SingleChoice(text) => text.clone(),
            AnswerKey::MultiChoiceMultiAnswer(keys) => keys.join(", "),
            AnswerKey::CategorizedChoice(mapping) => mapping
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn decode_text(raw: &Value, kind: QuestionKind, problem_id: &str) -> String {
    match raw {
        Value::String(text) => text.clone(),
        Value::Number(n) => n.to_string(),
        _ => {
            tracing::warn!(
                "Malformed stored answer for problem {} ({}), treating as empty",
                problem_id,
                kind
            );
            String::new()
        }
    }
}

fn decode_structured<T: serde::de::DeserializeOwned>(raw: &Value) -> Option<T> {
    match raw {
        Value::String(encoded) => serde_json::from_str(encoded).ok(),
        other => serde_json::from_value(other.clone()).ok(),
    }
}

/// A problem reduced to what the evaluator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub problem_id: String,
    pub answer: AnswerKey,
    /// Option keys; for `mck` these are the statements that each need a category.
    pub statement_keys: Vec<String>,
}

impl Question {
    pub fn new(problem_id: impl Into<String>, answer: AnswerKey) -> Self {
        Self {
            problem_id: problem_id.into(),
            answer,
            statement_keys: Vec::new(),
        }
    }

    pub fn with_statement_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn kind(&self) -> QuestionKind {
        self.answer.kind()
    }

    pub fn from_document(doc: &ProblemDocument) -> Result<Self, QuestionError> {
        let kind = doc
            .kind
            .parse::<QuestionKind>()
            .map_err(|UnknownKind(kind)| QuestionError::MalformedQuestion {
                problem_id: doc.problem_id.clone(),
                kind,
            })?;

        Ok(Self {
            problem_id: doc.problem_id.clone(),
            answer: AnswerKey::decode(kind, &doc.answer, &doc.problem_id),
            statement_keys: doc.options.keys().cloned().collect(),
        })
    }
}

/// Learner's answer as sent by the client; the shape is interpreted per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedResponse {
    Text(String),
    Selection(Vec<String>),
    Categorized(BTreeMap<String, String>),
}

impl SubmittedResponse {
    /// Whether the learner has filled every slot the question requires.
    pub fn is_complete_for(&self, question: &Question) -> bool {
        match (question.kind(), self) {
            (QuestionKind::Input | QuestionKind::SingleChoice, SubmittedResponse::Text(text)) => {
                !text.is_empty()
            }
            (QuestionKind::MultiChoiceMultiAnswer, SubmittedResponse::Selection(keys)) => {
                !keys.is_empty()
            }
            (QuestionKind::CategorizedChoice, SubmittedResponse::Categorized(mapping)) => {
                !mapping.is_empty()
                    && question
                        .statement_keys
                        .iter()
                        .all(|key| mapping.contains_key(key))
            }
            _ => false,
        }
    }

    /// Canonical form used to detect an unchanged resubmission.
    pub fn comparable(&self) -> ComparableResponse {
        let canonical = match self {
            SubmittedResponse::Text(text) => text.clone(),
            SubmittedResponse::Selection(keys) => {
                let mut sorted = keys.clone();
                sorted.sort();
                serde_json::to_string(&sorted).unwrap_or_default()
            }
            SubmittedResponse::Categorized(mapping) => {
                serde_json::to_string(mapping).unwrap_or_default()
            }
        };
        ComparableResponse(canonical)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparableResponse(String);

impl ComparableResponse {
    pub fn new(canonical: impl Into<String>) -> Self {
        Self(canonical.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(kind: &str, answer: Value) -> ProblemDocument {
        ProblemDocument {
            problem_id: "LS-001".to_string(),
            subtopic_id: "sub-1".to_string(),
            category_id: Some("aljabar".to_string()),
            kind: kind.to_string(),
            question_text: "Berapa 6 x 7?".to_string(),
            options: BTreeMap::from([
                ("s1".to_string(), "Pernyataan 1".to_string()),
                ("s2".to_string(), "Pernyataan 2".to_string()),
            ]),
            answer_categories: vec!["Benar".to_string(), "Salah".to_string()],
            answer,
            solution: None,
            video_url: None,
        }
    }

    #[test]
    fn unknown_kind_is_malformed_question() {
        let err = Question::from_document(&document("essay", json!("42"))).unwrap_err();
        assert_eq!(
            err,
            QuestionError::MalformedQuestion {
                problem_id: "LS-001".to_string(),
                kind: "essay".to_string(),
            }
        );
    }

    #[test]
    fn mcma_answer_accepts_encoded_string_and_array() {
        let encoded = Question::from_document(&document("mcma", json!("[\"A\",\"C\"]"))).unwrap();
        let structured = Question::from_document(&document("mcma", json!(["A", "C"]))).unwrap();

        let expected = AnswerKey::MultiChoiceMultiAnswer(vec!["A".to_string(), "C".to_string()]);
        assert_eq!(encoded.answer, expected);
        assert_eq!(structured.answer, expected);
    }

    #[test]
    fn malformed_structured_answers_fall_back_to_empty() {
        let mcma = Question::from_document(&document("mcma", json!("[\"A\","))).unwrap();
        assert_eq!(mcma.answer, AnswerKey::MultiChoiceMultiAnswer(Vec::new()));

        let mck = Question::from_document(&document("mck", json!("not json"))).unwrap();
        assert_eq!(mck.answer, AnswerKey::CategorizedChoice(BTreeMap::new()));

        let mck_wrong_shape = Question::from_document(&document("mck", json!([1, 2]))).unwrap();
        assert_eq!(
            mck_wrong_shape.answer,
            AnswerKey::CategorizedChoice(BTreeMap::new())
        );
    }

    #[test]
    fn numeric_input_answer_is_read_as_text() {
        let question = Question::from_document(&document("input", json!(42))).unwrap();
        assert_eq!(question.answer, AnswerKey::Input("42".to_string()));
    }

    #[test]
    fn categorized_completeness_requires_every_statement() {
        let question = Question::from_document(&document(
            "mck",
            json!({"s1": "Benar", "s2": "Salah"}),
        ))
        .unwrap();

        let partial = SubmittedResponse::Categorized(BTreeMap::from([(
            "s1".to_string(),
            "Benar".to_string(),
        )]));
        let full = SubmittedResponse::Categorized(BTreeMap::from([
            ("s1".to_string(), "Benar".to_string()),
            ("s2".to_string(), "Benar".to_string()),
        ]));

        assert!(!partial.is_complete_for(&question));
        assert!(full.is_complete_for(&question));
        assert!(!SubmittedResponse::Text("Benar".to_string()).is_complete_for(&question));
    }

    #[test]
    fn empty_text_and_selection_are_incomplete() {
        let input = Question::new("q", AnswerKey::Input("42".to_string()));
        assert!(!SubmittedResponse::Text(String::new()).is_complete_for(&input));

        let mcma = Question::new("q", AnswerKey::MultiChoiceMultiAnswer(vec!["A".to_string()]));
        assert!(!SubmittedResponse::Selection(Vec::new()).is_complete_for(&mcma));
    }

    #[test]
    fn comparable_selection_ignores_order() {
        let a = SubmittedResponse::Selection(vec!["B".to_string(), "A".to_string()]);
        let b = SubmittedResponse::Selection(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(a.comparable(), b.comparable());
        assert_eq!(a.comparable().as_str(), "[\"A\",\"B\"]");
    }

    #[test]
    fn response_shapes_deserialize_untagged() {
        let text: SubmittedResponse = serde_json::from_value(json!("42")).unwrap();
        let selection: SubmittedResponse = serde_json::from_value(json!(["A"])).unwrap();
        let categorized: SubmittedResponse =
            serde_json::from_value(json!({"s1": "Benar"})).unwrap();

        assert!(matches!(text, SubmittedResponse::Text(_)));
        assert!(matches!(selection, SubmittedResponse::Selection(_)));
        assert!(matches!(categorized, SubmittedResponse::Categorized(_)));
    }

    #[test]
    fn display_joins_structured_answers() {
        let mck = AnswerKey::CategorizedChoice(BTreeMap::from([
            ("s1".to_string(), "Benar".to_string()),
            ("s2".to_string(), "Salah".to_string()),
        ]));
        assert_eq!(mck.display(), "Benar, Salah");
        assert_eq!(
            AnswerKey::MultiChoiceMultiAnswer(vec!["A".to_string(), "C".to_string()]).display(),
            "A, C"
        );
    }
}
