mod common;

use axum::http::StatusCode;
use mathpractice_api::models::report::{ReportStatus, ReportType};
use serde_json::json;

#[tokio::test]
async fn report_is_created_open() {
    let app = common::create_test_app().await;

    let (status, body) = app
        .post(
            "reporter",
            "/api/v1/problems/LS-MCQ-1/reports",
            json!({
                "report_type": "unclear_problem",
                "content": "  Pilihan B dan C terlihat sama  "
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["report_id"].as_str().unwrap().starts_with("RE-"));
    assert_eq!(body["report_status"], "open");

    let reports = app.store.reports().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].user_id, "reporter");
    assert_eq!(reports[0].report_type, ReportType::UnclearProblem);
    assert_eq!(reports[0].report_status, ReportStatus::Open);
    assert_eq!(reports[0].report_content, "Pilihan B dan C terlihat sama");
}

#[tokio::test]
async fn report_type_defaults_to_wrong_answer() {
    let app = common::create_test_app().await;

    let (status, _) = app
        .post(
            "reporter",
            "/api/v1/problems/LS-IN-1/reports",
            json!({ "content": "Kunci jawabannya seharusnya enam" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        app.store.reports().await[0].report_type,
        ReportType::WrongAnswer
    );
}

#[tokio::test]
async fn short_report_is_rejected() {
    let app = common::create_test_app().await;

    let (status, body) = app
        .post(
            "reporter",
            "/api/v1/problems/LS-IN-1/reports",
            json!({ "report_type": "general_feedback", "content": "   oke     " }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(app.store.reports().await.is_empty());
}

#[tokio::test]
async fn unknown_report_type_is_rejected() {
    let app = common::create_test_app().await;

    let (status, _) = app
        .post(
            "reporter",
            "/api/v1/problems/LS-IN-1/reports",
            json!({ "report_type": "spam", "content": "Ini laporan yang cukup panjang" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
