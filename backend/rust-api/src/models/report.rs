use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const MIN_REPORT_CONTENT_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    WrongAnswer,
    UnclearProblem,
    BrokenVideo,
    GeneralFeedback,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::WrongAnswer => "wrong_answer",
            ReportType::UnclearProblem => "unclear_problem",
            ReportType::BrokenVideo => "broken_video",
            ReportType::GeneralFeedback => "general_feedback",
        }
    }

    /// Label shown to moderators.
    pub fn label(&self) -> &'static str {
        match self {
            ReportType::WrongAnswer => "Kesalahan Jawaban",
            ReportType::UnclearProblem => "Soal Kurang Jelas",
            ReportType::BrokenVideo => "Link Video Rusak",
            ReportType::GeneralFeedback => "Saran Umum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Open,
    Resolved,
}

/// Stored in `problem_reports`; moderated outside this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemReport {
    #[serde(rename = "_id")]
    pub report_id: String,
    pub user_id: String,
    pub problem_id: String,
    pub report_type: ReportType,
    pub report_content: String,
    pub report_status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[serde(default)]
    pub report_type: ReportType,

    #[validate(custom(function = "validate_report_content"))]
    pub content: String,
}

fn validate_report_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().chars().count() < MIN_REPORT_CONTENT_CHARS {
        let mut err = ValidationError::new("too_short");
        err.message = Some("Report must describe the problem in at least 10 characters".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReportResponse {
    pub report_id: String,
    pub report_status: ReportStatus,
}
