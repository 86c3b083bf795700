use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::ApiError,
    extractors::AppJson,
    models::{
        answer::CheckAnswerRequest,
        bookmark::BookmarkStatusResponse,
        report::{CreateReportRequest, CreateReportResponse},
        LearnerId,
    },
    services::AppState,
};

pub async fn get_problem(
    State(state): State<Arc<AppState>>,
    Extension(learner): Extension<LearnerId>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("Loading problem {} for learner {}", problem_id, learner);

    let view = state
        .answer_service()
        .problem_view(&learner, &problem_id)
        .await?;
    Ok(Json(view))
}

pub async fn check_answer(
    State(state): State<Arc<AppState>>,
    Extension(learner): Extension<LearnerId>,
    Path(problem_id): Path<String>,
    AppJson(req): AppJson<CheckAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        "Checking answer: learner={}, problem={}, visit={}",
        learner,
        problem_id,
        req.visit_id
    );

    let response = state
        .answer_service()
        .check_answer(&learner, &problem_id, &req)
        .await?;
    Ok(Json(response))
}

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(learner): Extension<LearnerId>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let progress = state
        .answer_service()
        .progress(&learner, &problem_id)
        .await?;
    Ok(Json(progress))
}

pub async fn get_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(learner): Extension<LearnerId>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bookmarked = state
        .bookmark_service()
        .is_bookmarked(&learner, &problem_id)
        .await?;
    Ok(Json(BookmarkStatusResponse {
        problem_id,
        bookmarked,
    }))
}

pub async fn toggle_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(learner): Extension<LearnerId>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bookmarked = state
        .bookmark_service()
        .toggle(&learner, &problem_id)
        .await?;
    Ok(Json(BookmarkStatusResponse {
        problem_id,
        bookmarked,
    }))
}

pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Extension(learner): Extension<LearnerId>,
    Path(problem_id): Path<String>,
    AppJson(req): AppJson<CreateReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .report_service()
        .submit(&learner, &problem_id, &req)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReportResponse {
            report_id: report.report_id,
            report_status: report.report_status,
        }),
    ))
}
