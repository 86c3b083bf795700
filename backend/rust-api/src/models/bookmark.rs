use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::ids::compound_key;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub problem_id: String,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(user_id: &str, problem_id: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: compound_key(&[user_id, problem_id]),
            user_id: user_id.to_string(),
            problem_id: problem_id.to_string(),
            created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookmarkStatusResponse {
    pub problem_id: String,
    pub bookmarked: bool,
}

/// One entry of the learner's bookmark page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkSummary {
    pub problem_id: String,
    pub question_text: String,
    pub subtopic_id: String,
    pub bookmarked_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookmarkListResponse {
    pub bookmarks: Vec<BookmarkSummary>,
}
