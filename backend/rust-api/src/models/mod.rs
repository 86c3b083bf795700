use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod answer;
pub mod bookmark;
pub mod progress;
pub mod question;
pub mod report;

use progress::ProgressView;
use question::QuestionKind;

/// Identifier of the authenticated learner (the `sub` claim of the access token).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerId(String);

impl LearnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Problem as served to a learner. The answer and solution stay hidden until solved.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProblemView {
    pub problem_id: String,
    pub subtopic_id: String,
    pub kind: QuestionKind,
    pub question_text: String,
    pub options: BTreeMap<String, String>,
    pub answer_categories: Vec<String>,
    pub video_url: Option<String>,
    pub progress: ProgressView,
    pub correct_answer: Option<String>,
    pub solution: Option<String>,
}

/// Row of a subtopic's problem list. Carries no answer data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSummary {
    pub problem_id: String,
    pub kind: String,
    pub question_text: String,
    pub is_correct: bool,
    pub attempts_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubtopicProblemsResponse {
    pub subtopic_id: String,
    pub problems: Vec<ProblemSummary>,
}
