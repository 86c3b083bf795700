use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookmarkStore, MemoKey, MemoStore, ProblemStore, ProgressStore, ReportStore};
use crate::models::bookmark::Bookmark;
use crate::models::progress::AttemptRecord;
use crate::models::question::{ComparableResponse, ProblemDocument};
use crate::models::report::ProblemReport;

/// Process-local implementation of every store, used by tests and local runs
/// without MongoDB/Redis.
#[derive(Default)]
pub struct InMemoryStore {
    problems: RwLock<HashMap<String, ProblemDocument>>,
    progress: RwLock<HashMap<String, AttemptRecord>>,
    bookmarks: RwLock<HashMap<String, Bookmark>>,
    reports: RwLock<Vec<ProblemReport>>,
    memos: RwLock<HashMap<MemoKey, ComparableResponse>>,
    fail_progress_writes: AtomicBool,
    progress_writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_problem(&self, problem: ProblemDocument) {
        self.problems
            .write()
            .await
            .insert(problem.problem_id.clone(), problem);
    }

    /// Makes every following progress upsert fail until switched back.
    pub fn set_progress_writes_failing(&self, failing: bool) {
        self.fail_progress_writes.store(failing, Ordering::SeqCst);
    }

    /// Number of progress upserts attempted, including failed ones.
    pub fn progress_write_count(&self) -> usize {
        self.progress_writes.load(Ordering::SeqCst)
    }

    pub async fn reports(&self) -> Vec<ProblemReport> {
        self.reports.read().await.clone()
    }
}

#[async_trait]
impl ProblemStore for InMemoryStore {
    async fn find_problem(&self, problem_id: &str) -> Result<Option<ProblemDocument>> {
        Ok(self.problems.read().await.get(problem_id).cloned())
    }

    async fn find_problems(&self, problem_ids: &[String]) -> Result<Vec<ProblemDocument>> {
        let problems = self.problems.read().await;
        Ok(problem_ids
            .iter()
            .filter_map(|id| problems.get(id).cloned())
            .collect())
    }

    async fn list_problems_by_subtopic(&self, subtopic_id: &str) -> Result<Vec<ProblemDocument>> {
        let mut problems: Vec<ProblemDocument> = self
            .problems
            .read()
            .await
            .values()
            .filter(|p| p.subtopic_id == subtopic_id)
            .cloned()
            .collect();
        problems.sort_by(|a, b| a.problem_id.cmp(&b.problem_id));
        Ok(problems)
    }

    async fn problem_categories(&self) -> Result<HashMap<String, String>> {
        Ok(self
            .problems
            .read()
            .await
            .values()
            .filter_map(|problem| {
                let category_id = problem.category_id.clone()?;
                Some((problem.problem_id.clone(), category_id))
            })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn find_progress(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> Result<Option<AttemptRecord>> {
        let key = AttemptRecord::key(user_id, problem_id);
        Ok(self.progress.read().await.get(&key).cloned())
    }

    async fn upsert_progress(&self, record: &AttemptRecord) -> Result<()> {
        self.progress_writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_progress_writes.load(Ordering::SeqCst) {
            anyhow::bail!("progress store unavailable");
        }
        self.progress
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<AttemptRecord>> {
        Ok(self
            .progress
            .read()
            .await
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookmarkStore for InMemoryStore {
    async fn is_bookmarked(&self, user_id: &str, problem_id: &str) -> Result<bool> {
        Ok(self
            .bookmarks
            .read()
            .await
            .values()
            .any(|b| b.user_id == user_id && b.problem_id == problem_id))
    }

    async fn add_bookmark(&self, bookmark: &Bookmark) -> Result<()> {
        self.bookmarks
            .write()
            .await
            .insert(bookmark.id.clone(), bookmark.clone());
        Ok(())
    }

    async fn remove_bookmark(&self, user_id: &str, problem_id: &str) -> Result<bool> {
        let mut bookmarks = self.bookmarks.write().await;
        let before = bookmarks.len();
        bookmarks.retain(|_, b| !(b.user_id == user_id && b.problem_id == problem_id));
        Ok(bookmarks.len() < before)
    }

    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>> {
        Ok(self
            .bookmarks
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn insert_report(&self, report: &ProblemReport) -> Result<()> {
        self.reports.write().await.push(report.clone());
        Ok(())
    }
}

#[async_trait]
impl MemoStore for InMemoryStore {
    async fn get_memo(&self, key: &MemoKey) -> Result<Option<ComparableResponse>> {
        Ok(self.memos.read().await.get(key).cloned())
    }

    async fn put_memo(&self, key: &MemoKey, memo: &ComparableResponse) -> Result<()> {
        self.memos.write().await.insert(key.clone(), memo.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
