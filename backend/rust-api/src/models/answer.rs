use serde::{Deserialize, Serialize};

use super::question::SubmittedResponse;

#[derive(Debug, Deserialize)]
pub struct CheckAnswerRequest {
    /// Client-generated id of the current page visit; a reload starts a new one.
    pub visit_id: String,
    pub response: SubmittedResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAnswerResponse {
    pub correct: bool,
    pub attempt_recorded: bool,
    pub attempts_count: u32,
    pub progress_saved: bool,
    pub locked: bool,
    pub notification: Option<Notification>,
    /// Only present once the problem is solved.
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}
