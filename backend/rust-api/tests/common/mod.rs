#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mathpractice_api::{
    config::Config,
    create_router,
    middlewares::auth::{AccessClaims, JwtService},
    models::question::ProblemDocument,
    services::AppState,
    storage::InMemoryStore,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const METRICS_AUTH: &str = "scraper:s3cret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    jwt: JwtService,
}

pub fn test_config() -> Config {
    Config {
        mongo_uri: "mongodb://unused".to_string(),
        mongo_database: "mathpractice_test".to_string(),
        redis_uri: "redis://unused".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        memo_ttl_seconds: 60,
        stats_utc_offset_minutes: 420,
        metrics_basic_auth: METRICS_AUTH.to_string(),
    }
}

pub async fn create_test_app() -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = Arc::new(InMemoryStore::new());
    seed_problems(&store).await;

    let state = Arc::new(AppState::in_memory(test_config(), store.clone()));

    TestApp {
        router: create_router(state),
        store,
        jwt: JwtService::new(JWT_SECRET),
    }
}

fn problem(
    id: &str,
    kind: &str,
    category: &str,
    options: &[(&str, &str)],
    answer: Value,
) -> ProblemDocument {
    ProblemDocument {
        problem_id: id.to_string(),
        subtopic_id: "subtopic-1".to_string(),
        category_id: Some(category.to_string()),
        kind: kind.to_string(),
        question_text: format!("Question {}", id),
        options: options
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        answer_categories: if kind == "mck" {
            vec!["Benar".to_string(), "Salah".to_string()]
        } else {
            Vec::new()
        },
        answer,
        solution: Some(format!("Solution of {}", id)),
        video_url: Some("https://video.example/solution".to_string()),
    }
}

async fn seed_problems(store: &InMemoryStore) {
    let problems = [
        problem("LS-IN-1", "input", "aljabar", &[], json!("Lima")),
        problem(
            "LS-MCQ-1",
            "mcq",
            "aljabar",
            &[("A", "2"), ("B", "3"), ("C", "4")],
            json!("B"),
        ),
        problem(
            "LS-MCMA-1",
            "mcma",
            "geometri",
            &[("A", "segitiga"), ("B", "persegi"), ("C", "lingkaran")],
            json!("[\"C\",\"A\"]"),
        ),
        problem(
            "LS-MCK-1",
            "mck",
            "geometri",
            &[("1", "Sudut siku 90 derajat"), ("2", "Lingkaran punya sudut")],
            json!("{\"1\":\"Benar\",\"2\":\"Salah\"}"),
        ),
        problem("LS-BROKEN-1", "mcma", "geometri", &[("A", "x")], json!("not json")),
        problem("LS-ESSAY-1", "essay", "aljabar", &[], json!("free text")),
    ];

    for p in problems {
        store.insert_problem(p).await;
    }
}

impl TestApp {
    pub fn token(&self, learner: &str) -> String {
        self.jwt
            .issue(&AccessClaims::for_learner(learner, 3600))
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, learner: &str, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header("authorization", format!("Bearer {}", self.token(learner)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post(&self, learner: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("authorization", format!("Bearer {}", self.token(learner)))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
    }

    pub async fn check(
        &self,
        learner: &str,
        problem_id: &str,
        visit_id: &str,
        response: Value,
    ) -> (StatusCode, Value) {
        self.post(
            learner,
            &format!("/api/v1/problems/{}/check", problem_id),
            json!({ "visit_id": visit_id, "response": response }),
        )
        .await
    }
}
