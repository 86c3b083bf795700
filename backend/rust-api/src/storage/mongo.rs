use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::ReplaceOptions,
    Collection, Database,
};

use super::{BookmarkStore, ProblemStore, ProgressStore, ReportStore};
use crate::metrics::track_db_operation;
use crate::models::bookmark::Bookmark;
use crate::models::progress::AttemptRecord;
use crate::models::question::ProblemDocument;
use crate::models::report::ProblemReport;

const PROBLEMS: &str = "problems";
const USER_PROGRESS: &str = "user_progress";
const USER_BOOKMARKS: &str = "user_bookmarks";
const PROBLEM_REPORTS: &str = "problem_reports";

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn problems(&self) -> Collection<ProblemDocument> {
        self.db.collection(PROBLEMS)
    }

    fn progress(&self) -> Collection<AttemptRecord> {
        self.db.collection(USER_PROGRESS)
    }

    fn bookmarks(&self) -> Collection<Bookmark> {
        self.db.collection(USER_BOOKMARKS)
    }

    fn upsert_options() -> ReplaceOptions {
        ReplaceOptions::builder().upsert(true).build()
    }
}

#[async_trait]
impl ProblemStore for MongoStore {
    async fn find_problem(&self, problem_id: &str) -> Result<Option<ProblemDocument>> {
        track_db_operation("find_one", PROBLEMS, async {
            self.problems()
                .find_one(doc! { "_id": problem_id })
                .await
                .context("Failed to query problems collection")
        })
        .await
    }

    async fn find_problems(&self, problem_ids: &[String]) -> Result<Vec<ProblemDocument>> {
        if problem_ids.is_empty() {
            return Ok(Vec::new());
        }
        track_db_operation("find", PROBLEMS, async {
            self.problems()
                .find(doc! { "_id": { "$in": problem_ids.to_vec() } })
                .await
                .context("Failed to query problems by id")?
                .try_collect()
                .await
                .context("Failed to read problems")
        })
        .await
    }

    async fn list_problems_by_subtopic(&self, subtopic_id: &str) -> Result<Vec<ProblemDocument>> {
        track_db_operation("find", PROBLEMS, async {
            self.problems()
                .find(doc! { "subtopic_id": subtopic_id })
                .sort(doc! { "_id": 1 })
                .await
                .context("Failed to query subtopic problems")?
                .try_collect()
                .await
                .context("Failed to read subtopic problems")
        })
        .await
    }

    async fn problem_categories(&self) -> Result<HashMap<String, String>> {
        track_db_operation("find", PROBLEMS, async {
            let collection: Collection<Document> = self.db.collection(PROBLEMS);
            let docs: Vec<Document> = collection
                .find(doc! { "category_id": { "$type": "string" } })
                .projection(doc! { "_id": 1, "category_id": 1 })
                .await
                .context("Failed to query problem categories")?
                .try_collect()
                .await
                .context("Failed to read problem categories")?;

            let categories = docs
                .iter()
                .filter_map(|doc| {
                    let problem_id = doc.get_str("_id").ok()?;
                    let category_id = doc.get_str("category_id").ok()?;
                    Some((problem_id.to_string(), category_id.to_string()))
                })
                .collect();
            Ok(categories)
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for MongoStore {
    async fn find_progress(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> Result<Option<AttemptRecord>> {
        let id = AttemptRecord::key(user_id, problem_id);
        track_db_operation("find_one", USER_PROGRESS, async {
            self.progress()
                .find_one(doc! { "_id": id.as_str() })
                .await
                .context("Failed to query user progress")
        })
        .await
    }

    async fn upsert_progress(&self, record: &AttemptRecord) -> Result<()> {
        track_db_operation("upsert", USER_PROGRESS, async {
            self.progress()
                .replace_one(doc! { "_id": record.id.as_str() }, record)
                .with_options(Self::upsert_options())
                .await
                .context("Failed to upsert user progress")?;
            Ok(())
        })
        .await
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<AttemptRecord>> {
        track_db_operation("find", USER_PROGRESS, async {
            self.progress()
                .find(doc! { "user_id": user_id })
                .await
                .context("Failed to query user progress")?
                .try_collect()
                .await
                .context("Failed to read user progress")
        })
        .await
    }
}

#[async_trait]
impl BookmarkStore for MongoStore {
    async fn is_bookmarked(&self, user_id: &str, problem_id: &str) -> Result<bool> {
        let count = track_db_operation("count", USER_BOOKMARKS, async {
            self.bookmarks()
                .count_documents(doc! { "user_id": user_id, "problem_id": problem_id })
                .await
                .context("Failed to query bookmarks")
        })
        .await?;
        Ok(count > 0)
    }

    async fn add_bookmark(&self, bookmark: &Bookmark) -> Result<()> {
        track_db_operation("upsert", USER_BOOKMARKS, async {
            self.bookmarks()
                .replace_one(doc! { "_id": bookmark.id.as_str() }, bookmark)
                .with_options(Self::upsert_options())
                .await
                .context("Failed to add bookmark")?;
            Ok(())
        })
        .await
    }

    async fn remove_bookmark(&self, user_id: &str, problem_id: &str) -> Result<bool> {
        let result = track_db_operation("delete", USER_BOOKMARKS, async {
            self.bookmarks()
                .delete_one(doc! { "user_id": user_id, "problem_id": problem_id })
                .await
                .context("Failed to remove bookmark")
        })
        .await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>> {
        track_db_operation("find", USER_BOOKMARKS, async {
            self.bookmarks()
                .find(doc! { "user_id": user_id })
                .await
                .context("Failed to query bookmarks")?
                .try_collect()
                .await
                .context("Failed to read bookmarks")
        })
        .await
    }
}

#[async_trait]
impl ReportStore for MongoStore {
    async fn insert_report(&self, report: &ProblemReport) -> Result<()> {
        track_db_operation("insert", PROBLEM_REPORTS, async {
            self.db
                .collection::<ProblemReport>(PROBLEM_REPORTS)
                .insert_one(report)
                .await
                .context("Failed to insert problem report")?;
            Ok(())
        })
        .await
    }
}
