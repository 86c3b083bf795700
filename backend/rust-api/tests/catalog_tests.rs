mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn subtopic_lists_problems_with_progress() {
    let app = common::create_test_app().await;
    let user = format!("test-user-{}", Uuid::new_v4());

    app.check(&user, "LS-MCQ-1", "v1", json!("A")).await;
    app.check(&user, "LS-MCQ-1", "v1", json!("B")).await;

    let (status, body) = app.get(&user, "/api/v1/subtopics/subtopic-1/problems").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtopic_id"], "subtopic-1");

    let problems = body["problems"].as_array().unwrap();
    let ids: Vec<&str> = problems
        .iter()
        .map(|p| p["problem_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "LS-BROKEN-1",
            "LS-ESSAY-1",
            "LS-IN-1",
            "LS-MCK-1",
            "LS-MCMA-1",
            "LS-MCQ-1"
        ]
    );

    let mcq = &problems[5];
    assert_eq!(mcq["kind"], "mcq");
    assert_eq!(mcq["question_text"], "Question LS-MCQ-1");
    assert_eq!(mcq["is_correct"], true);
    assert_eq!(mcq["attempts_count"], 2);
    assert_eq!(problems[2]["is_correct"], false);
    assert_eq!(problems[2]["attempts_count"], 0);
}

#[tokio::test]
async fn subtopic_list_never_exposes_answers() {
    let app = common::create_test_app().await;
    let user = format!("test-user-{}", Uuid::new_v4());
    app.check(&user, "LS-IN-1", "v1", json!("lima")).await;

    let (_, body) = app.get(&user, "/api/v1/subtopics/subtopic-1/problems").await;
    for problem in body["problems"].as_array().unwrap() {
        let fields = problem.as_object().unwrap();
        for hidden in ["answer", "correct_answer", "solution", "options"] {
            assert!(!fields.contains_key(hidden), "{} leaked", hidden);
        }
    }
    assert!(!body.to_string().contains("Lima"));
}

#[tokio::test]
async fn unknown_subtopic_is_empty() {
    let app = common::create_test_app().await;
    let (status, body) = app.get("someone", "/api/v1/subtopics/none/problems").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["problems"].as_array().unwrap().is_empty());
}
