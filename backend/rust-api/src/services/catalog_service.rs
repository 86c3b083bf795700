use std::collections::HashMap;
use std::sync::Arc;

use super::ServiceError;
use crate::models::progress::AttemptRecord;
use crate::models::{LearnerId, ProblemSummary};
use crate::storage::{ProblemStore, ProgressStore};

/// Browsing side of the catalog: a subtopic's problems with the learner's progress.
pub struct CatalogService {
    problems: Arc<dyn ProblemStore>,
    progress: Arc<dyn ProgressStore>,
}

impl CatalogService {
    pub fn new(problems: Arc<dyn ProblemStore>, progress: Arc<dyn ProgressStore>) -> Self {
        Self { problems, progress }
    }

    /// An unknown subtopic yields an empty list.
    pub async fn subtopic_problems(
        &self,
        learner: &LearnerId,
        subtopic_id: &str,
    ) -> Result<Vec<ProblemSummary>, ServiceError> {
        let problems = self.problems.list_problems_by_subtopic(subtopic_id).await?;
        if problems.is_empty() {
            return Ok(Vec::new());
        }

        let progress: HashMap<String, AttemptRecord> = self
            .progress
            .list_progress(learner.as_str())
            .await?
            .into_iter()
            .map(|record| (record.problem_id.clone(), record))
            .collect();

        tracing::debug!(
            "Listing {} problems of subtopic {} for learner {}",
            problems.len(),
            subtopic_id,
            learner
        );

        Ok(problems
            .into_iter()
            .map(|problem| {
                let record = progress.get(&problem.problem_id);
                ProblemSummary {
                    is_correct: record.is_some_and(|r| r.is_correct),
                    attempts_count: record.map(|r| r.attempts_count).unwrap_or(0),
                    problem_id: problem.problem_id,
                    kind: problem.kind,
                    question_text: problem.question_text,
                }
            })
            .collect())
    }
}
