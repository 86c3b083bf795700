//! Persistence capabilities, backed by MongoDB/Redis or by
//! [`memory::InMemoryStore`].

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::bookmark::Bookmark;
use crate::models::progress::AttemptRecord;
use crate::models::question::{ComparableResponse, ProblemDocument};
use crate::models::report::ProblemReport;
use crate::utils::ids::compound_key;

pub mod memory;
pub mod mongo;
pub mod redis_memo;

pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use redis_memo::RedisMemoStore;

#[async_trait]
pub trait ProblemStore: Send + Sync {
    async fn find_problem(&self, problem_id: &str) -> Result<Option<ProblemDocument>>;

    /// Problems among `problem_ids` that exist, in no particular order.
    async fn find_problems(&self, problem_ids: &[String]) -> Result<Vec<ProblemDocument>>;

    /// Problems of one subtopic ordered by id.
    async fn list_problems_by_subtopic(&self, subtopic_id: &str) -> Result<Vec<ProblemDocument>>;

    /// problem_id -> category_id for every problem that has a category.
    async fn problem_categories(&self) -> Result<HashMap<String, String>>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn find_progress(&self, user_id: &str, problem_id: &str)
        -> Result<Option<AttemptRecord>>;

    /// Creates the record if absent, replaces it otherwise.
    async fn upsert_progress(&self, record: &AttemptRecord) -> Result<()>;

    async fn list_progress(&self, user_id: &str) -> Result<Vec<AttemptRecord>>;
}

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn is_bookmarked(&self, user_id: &str, problem_id: &str) -> Result<bool>;

    async fn add_bookmark(&self, bookmark: &Bookmark) -> Result<()>;

    /// Returns whether a bookmark was actually removed.
    async fn remove_bookmark(&self, user_id: &str, problem_id: &str) -> Result<bool>;

    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert_report(&self, report: &ProblemReport) -> Result<()>;
}

/// Scope of one evaluation memo: a learner's visit to one problem page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    pub user_id: String,
    pub visit_id: String,
    pub problem_id: String,
}

impl MemoKey {
    pub fn new(user_id: &str, visit_id: &str, problem_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            visit_id: visit_id.to_string(),
            problem_id: problem_id.to_string(),
        }
    }

    pub fn redis_key(&self) -> String {
        format!(
            "memo:{}",
            compound_key(&[
                self.user_id.as_str(),
                self.visit_id.as_str(),
                self.problem_id.as_str(),
            ])
        )
    }
}

/// Short-lived storage for the last recorded response of a visit.
#[async_trait]
pub trait MemoStore: Send + Sync {
    async fn get_memo(&self, key: &MemoKey) -> Result<Option<ComparableResponse>>;

    async fn put_memo(&self, key: &MemoKey, memo: &ComparableResponse) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memo_key_is_scoped_by_visit() {
        let a = MemoKey::new("u1", "visit-a", "LS-1");
        let b = MemoKey::new("u1", "visit-b", "LS-1");
        assert_eq!(a.redis_key(), "memo:u1:visit-a:LS-1");
        assert_ne!(a.redis_key(), b.redis_key());
    }

    #[test]
    fn memo_key_parts_cannot_bleed_into_each_other() {
        let a = MemoKey::new("u1", "v:B", "C");
        let b = MemoKey::new("u1", "v", "B:C");
        assert_ne!(a.redis_key(), b.redis_key());
        assert_eq!(a.redis_key(), "memo:u1:v%3AB:C");
    }
}
