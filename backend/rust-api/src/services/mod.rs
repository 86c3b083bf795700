use std::sync::Arc;

use redis::aio::ConnectionManager;
use thiserror::Error;

use crate::config::Config;
use crate::middlewares::auth::JwtService;
use crate::models::question::QuestionError;
use crate::storage::{
    BookmarkStore, InMemoryStore, MemoStore, MongoStore, ProblemStore, ProgressStore,
    RedisMemoStore, ReportStore,
};
use crate::utils::time::offset_from_minutes;

pub mod answer_service;
pub mod bookmark_service;
pub mod catalog_service;
pub mod evaluator;
pub mod report_service;
pub mod stats_service;

use answer_service::AnswerService;
use bookmark_service::BookmarkService;
use catalog_service::CatalogService;
use report_service::ReportService;
use stats_service::StatsService;

/// Failure of a learner-facing operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    MalformedQuestion(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub struct AppState {
    pub config: Config,
    pub jwt: JwtService,
    pub problems: Arc<dyn ProblemStore>,
    pub progress: Arc<dyn ProgressStore>,
    pub bookmarks: Arc<dyn BookmarkStore>,
    pub reports: Arc<dyn ReportStore>,
    pub memos: Arc<dyn MemoStore>,
}

impl AppState {
    pub async fn new(
        config: Config,
        mongo_client: mongodb::Client,
        redis_client: redis::Client,
    ) -> anyhow::Result<Self> {
        let mongo = MongoStore::new(mongo_client.database(&config.mongo_database));

        tracing::info!("Attempting to connect to Redis...");

        let redis = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            ConnectionManager::new(redis_client),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis connection timeout after 30s"))??;

        let memos = RedisMemoStore::new(redis, config.memo_ttl_seconds);
        tokio::time::timeout(std::time::Duration::from_secs(5), memos.ping())
            .await
            .map_err(|_| anyhow::anyhow!("Redis PING timeout after 5s"))??;

        tracing::info!("Redis connection established successfully");

        let mongo = Arc::new(mongo);
        Ok(Self {
            jwt: JwtService::new(&config.jwt_secret),
            config,
            problems: mongo.clone(),
            progress: mongo.clone(),
            bookmarks: mongo.clone(),
            reports: mongo,
            memos: Arc::new(memos),
        })
    }

    /// State backed entirely by one [`InMemoryStore`].
    pub fn in_memory(config: Config, store: Arc<InMemoryStore>) -> Self {
        Self {
            jwt: JwtService::new(&config.jwt_secret),
            config,
            problems: store.clone(),
            progress: store.clone(),
            bookmarks: store.clone(),
            reports: store.clone(),
            memos: store,
        }
    }

    pub fn answer_service(&self) -> AnswerService {
        AnswerService::new(
            self.problems.clone(),
            self.progress.clone(),
            self.memos.clone(),
        )
    }

    pub fn stats_service(&self) -> StatsService {
        StatsService::new(
            self.problems.clone(),
            self.progress.clone(),
            offset_from_minutes(self.config.stats_utc_offset_minutes),
        )
    }

    pub fn bookmark_service(&self) -> BookmarkService {
        BookmarkService::new(self.problems.clone(), self.bookmarks.clone())
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.problems.clone(), self.progress.clone())
    }

    pub fn report_service(&self) -> ReportService {
        ReportService::new(self.problems.clone(), self.reports.clone())
    }
}
