use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use super::ServiceError;
use crate::metrics::BOOKMARK_TOGGLES_TOTAL;
use crate::models::bookmark::{Bookmark, BookmarkSummary};
use crate::models::question::ProblemDocument;
use crate::models::LearnerId;
use crate::storage::{BookmarkStore, ProblemStore};

pub struct BookmarkService {
    problems: Arc<dyn ProblemStore>,
    bookmarks: Arc<dyn BookmarkStore>,
}

impl BookmarkService {
    pub fn new(problems: Arc<dyn ProblemStore>, bookmarks: Arc<dyn BookmarkStore>) -> Self {
        Self {
            problems,
            bookmarks,
        }
    }

    pub async fn is_bookmarked(
        &self,
        learner: &LearnerId,
        problem_id: &str,
    ) -> Result<bool, ServiceError> {
        Ok(self
            .bookmarks
            .is_bookmarked(learner.as_str(), problem_id)
            .await?)
    }

    /// Adds the bookmark if absent, removes it otherwise. Returns the new state.
    pub async fn toggle(&self, learner: &LearnerId, problem_id: &str) -> Result<bool, ServiceError> {
        if self.problems.find_problem(problem_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Problem {} not found",
                problem_id
            )));
        }

        if self
            .bookmarks
            .remove_bookmark(learner.as_str(), problem_id)
            .await?
        {
            BOOKMARK_TOGGLES_TOTAL.with_label_values(&["removed"]).inc();
            tracing::info!("Bookmark removed: learner={}, problem={}", learner, problem_id);
            return Ok(false);
        }

        let bookmark = Bookmark::new(learner.as_str(), problem_id, Utc::now());
        self.bookmarks.add_bookmark(&bookmark).await?;
        BOOKMARK_TOGGLES_TOTAL.with_label_values(&["added"]).inc();
        tracing::info!("Bookmark added: learner={}, problem={}", learner, problem_id);
        Ok(true)
    }

    /// Bookmarked problems, newest first. Bookmarks of deleted problems are skipped.
    pub async fn list(&self, learner: &LearnerId) -> Result<Vec<BookmarkSummary>, ServiceError> {
        let mut bookmarks = self.bookmarks.list_bookmarks(learner.as_str()).await?;
        bookmarks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.problem_id.cmp(&b.problem_id))
        });

        let ids: Vec<String> = bookmarks.iter().map(|b| b.problem_id.clone()).collect();
        let problems: HashMap<String, ProblemDocument> = self
            .problems
            .find_problems(&ids)
            .await?
            .into_iter()
            .map(|p| (p.problem_id.clone(), p))
            .collect();

        Ok(bookmarks
            .into_iter()
            .filter_map(|bookmark| {
                let problem = problems.get(&bookmark.problem_id)?;
                Some(BookmarkSummary {
                    question_text: problem.question_text.clone(),
                    subtopic_id: problem.subtopic_id.clone(),
                    problem_id: bookmark.problem_id,
                    bookmarked_at: bookmark.created_at,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use chrono::{Duration, TimeZone};

    async fn setup() -> (BookmarkService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        for id in ["LS-1", "LS-2", "LS-3"] {
            store
                .insert_problem(ProblemDocument {
                    problem_id: id.to_string(),
                    subtopic_id: "s".to_string(),
                    category_id: None,
                    kind: "mcq".to_string(),
                    question_text: format!("Soal {}", id),
                    options: Default::default(),
                    answer_categories: Vec::new(),
                    answer: serde_json::json!("A"),
                    solution: None,
                    video_url: None,
                })
                .await;
        }
        (BookmarkService::new(store.clone(), store.clone()), store)
    }

    #[tokio::test]
    async fn toggle_flips_state() {
        let (service, _store) = setup().await;
        let learner = LearnerId::new("u1");

        assert!(service.toggle(&learner, "LS-1").await.unwrap());
        assert!(service.is_bookmarked(&learner, "LS-1").await.unwrap());
        assert!(!service.toggle(&learner, "LS-1").await.unwrap());
        assert!(!service.is_bookmarked(&learner, "LS-1").await.unwrap());
    }

    #[tokio::test]
    async fn bookmarks_are_per_learner() {
        let (service, _store) = setup().await;

        service.toggle(&LearnerId::new("u1"), "LS-1").await.unwrap();
        assert!(service.list(&LearnerId::new("u2")).await.unwrap().is_empty());
        let listed = service.list(&LearnerId::new("u1")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].problem_id, "LS-1");
        assert_eq!(listed[0].question_text, "Soal LS-1");
        assert_eq!(listed[0].subtopic_id, "s");
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (service, store) = setup().await;
        let base = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();

        for (id, minutes) in [("LS-2", 0), ("LS-3", 30), ("LS-1", 10)] {
            store
                .add_bookmark(&Bookmark::new("u1", id, base + Duration::minutes(minutes)))
                .await
                .unwrap();
        }

        let ids: Vec<String> = service
            .list(&LearnerId::new("u1"))
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.problem_id)
            .collect();
        assert_eq!(ids, vec!["LS-3", "LS-1", "LS-2"]);
    }

    #[tokio::test]
    async fn bookmarks_of_deleted_problems_are_skipped() {
        let (service, store) = setup().await;
        store
            .add_bookmark(&Bookmark::new("u1", "LS-GONE", Utc::now()))
            .await
            .unwrap();
        store
            .add_bookmark(&Bookmark::new("u1", "LS-2", Utc::now()))
            .await
            .unwrap();

        let listed = service.list(&LearnerId::new("u1")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].problem_id, "LS-2");
    }

    #[tokio::test]
    async fn unknown_problem_cannot_be_bookmarked() {
        let (service, _store) = setup().await;
        let err = service
            .toggle(&LearnerId::new("u1"), "LS-404")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
