use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::ids::compound_key;

/// Per learner, per problem attempt counter (`user_progress` collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub problem_id: String,
    pub is_correct: bool,
    pub attempts_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn new(
        user_id: &str,
        problem_id: &str,
        is_correct: bool,
        attempts_count: u32,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::key(user_id, problem_id),
            user_id: user_id.to_string(),
            problem_id: problem_id.to_string(),
            is_correct,
            attempts_count,
            updated_at,
        }
    }

    pub fn key(user_id: &str, problem_id: &str) -> String {
        compound_key(&[user_id, problem_id])
    }
}

/// Progress as shown on the problem page; defaults for unattempted problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub problem_id: String,
    pub is_correct: bool,
    pub attempts_count: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProgressView {
    pub fn unattempted(problem_id: &str) -> Self {
        Self {
            problem_id: problem_id.to_string(),
            is_correct: false,
            attempts_count: 0,
            updated_at: None,
        }
    }
}

impl From<&AttemptRecord> for ProgressView {
    fn from(record: &AttemptRecord) -> Self {
        Self {
            problem_id: record.problem_id.clone(),
            is_correct: record.is_correct,
            attempts_count: record.attempts_count,
            updated_at: Some(record.updated_at),
        }
    }
}

/// Solved problems bucketed by how many attempts they took.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyBreakdown {
    pub first_attempt: u32,
    pub second_attempt: u32,
    pub third_attempt: u32,
    pub fourth_or_more: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub solved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerStats {
    pub category_id: Option<String>,
    pub total_distinct_attempted: u32,
    pub total_solved: u32,
    pub total_all_attempts: u32,
    /// Percentage, rounded to two decimals.
    pub accuracy: f64,
    pub avg_attempts_per_solved: f64,
    pub efficiency: EfficiencyBreakdown,
    pub daily_streak: u32,
    pub recent_days: Vec<DayStatus>,
    pub recent_activity: Vec<ProgressView>,
}
