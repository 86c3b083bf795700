mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn fresh_learner_has_empty_stats() {
    let app = common::create_test_app().await;
    let user = format!("test-user-{}", Uuid::new_v4());

    let (status, body) = app.get(&user, "/api/v1/me/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_distinct_attempted"], 0);
    assert_eq!(body["accuracy"], 0.0);
    assert_eq!(body["daily_streak"], 0);
    assert_eq!(body["recent_days"].as_array().unwrap().len(), 7);
    assert!(body["recent_activity"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn stats_follow_answer_checks() {
    let app = common::create_test_app().await;
    let user = format!("test-user-{}", Uuid::new_v4());

    // Solved on the first attempt.
    app.check(&user, "LS-MCQ-1", "v1", json!("B")).await;
    // Solved on the second attempt.
    app.check(&user, "LS-IN-1", "v1", json!("6")).await;
    app.check(&user, "LS-IN-1", "v1", json!("lima")).await;
    // Attempted but unsolved.
    app.check(&user, "LS-MCMA-1", "v1", json!(["B"])).await;

    let (status, body) = app.get(&user, "/api/v1/me/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_distinct_attempted"], 3);
    assert_eq!(body["total_solved"], 2);
    assert_eq!(body["total_all_attempts"], 4);
    assert_eq!(body["accuracy"], 66.67);
    assert_eq!(body["avg_attempts_per_solved"], 2.0);
    assert_eq!(body["efficiency"]["first_attempt"], 1);
    assert_eq!(body["efficiency"]["second_attempt"], 1);
    assert_eq!(body["daily_streak"], 1);
    assert_eq!(body["recent_days"][6]["solved"], true);
    assert_eq!(body["recent_activity"].as_array().unwrap().len(), 3);
    assert_eq!(body["recent_activity"][0]["problem_id"], "LS-MCMA-1");
}

#[tokio::test]
async fn category_filter_narrows_totals() {
    let app = common::create_test_app().await;
    let user = format!("test-user-{}", Uuid::new_v4());

    app.check(&user, "LS-MCQ-1", "v1", json!("B")).await;
    app.check(&user, "LS-MCK-1", "v1", json!({ "1": "Salah", "2": "Salah" }))
        .await;

    let (_, body) = app
        .get(&user, "/api/v1/me/stats?category_id=geometri")
        .await;
    assert_eq!(body["category_id"], "geometri");
    assert_eq!(body["total_distinct_attempted"], 1);
    assert_eq!(body["total_solved"], 0);
    assert_eq!(body["daily_streak"], 1);
}
