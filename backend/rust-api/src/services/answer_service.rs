use std::sync::Arc;

use chrono::Utc;

use super::evaluator::{evaluate, Disposition};
use super::ServiceError;
use crate::metrics::{record_answer_check, record_progress_write};
use crate::models::answer::{CheckAnswerRequest, CheckAnswerResponse, Notification};
use crate::models::progress::{AttemptRecord, ProgressView};
use crate::models::question::{ProblemDocument, Question};
use crate::models::{LearnerId, ProblemView};
use crate::storage::{MemoKey, MemoStore, ProblemStore, ProgressStore};
use crate::utils::retry::{retry_async, RetryConfig};

const CORRECT_MESSAGE: &str = "Correct answer!";
const SAVE_FAILED_MESSAGE: &str = "Failed to save answer progress.";

/// Runs an answer check end to end: evaluate, persist, and only then update the memo.
pub struct AnswerService {
    problems: Arc<dyn ProblemStore>,
    progress: Arc<dyn ProgressStore>,
    memos: Arc<dyn MemoStore>,
    retry: RetryConfig,
}

impl AnswerService {
    pub fn new(
        problems: Arc<dyn ProblemStore>,
        progress: Arc<dyn ProgressStore>,
        memos: Arc<dyn MemoStore>,
    ) -> Self {
        Self {
            problems,
            progress,
            memos,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn check_answer(
        &self,
        learner: &LearnerId,
        problem_id: &str,
        req: &CheckAnswerRequest,
    ) -> Result<CheckAnswerResponse, ServiceError> {
        if req.visit_id.trim().is_empty() {
            return Err(ServiceError::Invalid("visit_id must not be empty".to_string()));
        }

        let problem = self.load_problem(problem_id).await?;
        let question = Question::from_document(&problem)?;

        if !req.response.is_complete_for(&question) {
            return Err(ServiceError::Invalid(format!(
                "Response is incomplete for a {} question",
                question.kind()
            )));
        }

        let prior = self.load_progress(learner, problem_id).await?;

        let memo_key = MemoKey::new(learner.as_str(), &req.visit_id, problem_id);
        let last_memo = match self.memos.get_memo(&memo_key).await {
            Ok(memo) => memo,
            Err(e) => {
                tracing::warn!("Evaluation memo unavailable, checking without it: {:#}", e);
                None
            }
        };

        let outcome = evaluate(&question, &req.response, prior.as_ref(), last_memo.as_ref());
        record_answer_check(outcome.disposition.as_str(), outcome.is_correct);

        tracing::info!(
            "Answer check: learner={}, problem={}, disposition={}, correct={}",
            learner,
            problem_id,
            outcome.disposition.as_str(),
            outcome.is_correct
        );

        let solved_answer = |solved: bool| solved.then(|| question.answer.display());

        if outcome.disposition != Disposition::Recorded {
            let locked = outcome.disposition == Disposition::Locked;
            return Ok(CheckAnswerResponse {
                correct: outcome.is_correct,
                attempt_recorded: false,
                attempts_count: outcome.new_attempts_count,
                progress_saved: true,
                locked,
                notification: None,
                correct_answer: solved_answer(outcome.is_correct),
            });
        }

        let record = AttemptRecord::new(
            learner.as_str(),
            problem_id,
            outcome.is_correct,
            outcome.new_attempts_count,
            Utc::now(),
        );

        let saved = retry_async("upsert_progress", &self.retry, || {
            self.progress.upsert_progress(&record)
        })
        .await;
        record_progress_write(saved.is_ok());

        match saved {
            Ok(()) => {
                if let Err(e) = self.memos.put_memo(&memo_key, &outcome.comparable).await {
                    tracing::warn!("Failed to store evaluation memo: {:#}", e);
                }

                Ok(CheckAnswerResponse {
                    correct: outcome.is_correct,
                    attempt_recorded: true,
                    attempts_count: outcome.new_attempts_count,
                    progress_saved: true,
                    locked: outcome.is_correct,
                    notification: outcome
                        .is_correct
                        .then(|| Notification::success(CORRECT_MESSAGE)),
                    correct_answer: solved_answer(outcome.is_correct),
                })
            }
            Err(e) => {
                tracing::error!(
                    "Failed to save progress: learner={}, problem={}: {:#}",
                    learner,
                    problem_id,
                    e
                );

                Ok(CheckAnswerResponse {
                    correct: outcome.is_correct,
                    attempt_recorded: false,
                    attempts_count: prior.map(|r| r.attempts_count).unwrap_or(0),
                    progress_saved: false,
                    locked: false,
                    notification: Some(Notification::error(SAVE_FAILED_MESSAGE)),
                    correct_answer: solved_answer(outcome.is_correct),
                })
            }
        }
    }

    pub async fn progress(
        &self,
        learner: &LearnerId,
        problem_id: &str,
    ) -> Result<ProgressView, ServiceError> {
        let record = self.load_progress(learner, problem_id).await?;
        Ok(record
            .as_ref()
            .map(ProgressView::from)
            .unwrap_or_else(|| ProgressView::unattempted(problem_id)))
    }

    pub async fn problem_view(
        &self,
        learner: &LearnerId,
        problem_id: &str,
    ) -> Result<ProblemView, ServiceError> {
        let problem = self.load_problem(problem_id).await?;
        let question = Question::from_document(&problem)?;
        let progress = self.progress(learner, problem_id).await?;
        let solved = progress.is_correct;

        Ok(ProblemView {
            kind: question.kind(),
            correct_answer: solved.then(|| question.answer.display()),
            solution: if solved { problem.solution } else { None },
            problem_id: problem.problem_id,
            subtopic_id: problem.subtopic_id,
            question_text: problem.question_text,
            options: problem.options,
            answer_categories: problem.answer_categories,
            video_url: problem.video_url,
            progress,
        })
    }

    async fn load_problem(&self, problem_id: &str) -> Result<ProblemDocument, ServiceError> {
        retry_async("find_problem", &self.retry, || {
            self.problems.find_problem(problem_id)
        })
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Problem {} not found", problem_id)))
    }

    async fn load_progress(
        &self,
        learner: &LearnerId,
        problem_id: &str,
    ) -> Result<Option<AttemptRecord>, ServiceError> {
        let record = retry_async("find_progress", &self.retry, || {
            self.progress.find_progress(learner.as_str(), problem_id)
        })
        .await?;
        Ok(record)
    }
}
