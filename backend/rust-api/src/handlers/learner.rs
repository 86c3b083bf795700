use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{bookmark::BookmarkListResponse, LearnerId, SubtopicProblemsResponse},
    services::AppState,
};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub category_id: Option<String>,
}

pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Extension(learner): Extension<LearnerId>,
) -> Result<impl IntoResponse, ApiError> {
    let bookmarks = state.bookmark_service().list(&learner).await?;
    Ok(Json(BookmarkListResponse { bookmarks }))
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(learner): Extension<LearnerId>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let category = query.category_id.as_deref().filter(|c| !c.is_empty());

    let stats = state
        .stats_service()
        .learner_stats(&learner, category, Utc::now())
        .await?;
    Ok(Json(stats))
}

pub async fn list_subtopic_problems(
    State(state): State<Arc<AppState>>,
    Extension(learner): Extension<LearnerId>,
    Path(subtopic_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let problems = state
        .catalog_service()
        .subtopic_problems(&learner, &subtopic_id)
        .await?;
    Ok(Json(SubtopicProblemsResponse {
        subtopic_id,
        problems,
    }))
}
