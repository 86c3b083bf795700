use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .nest(
            "/api/v1",
            api_routes()
                .route_layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    middlewares::auth::auth_middleware,
                ))
                .layer(cors),
        )
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/problems/{id}", get(handlers::problems::get_problem))
        .route(
            "/problems/{id}/check",
            post(handlers::problems::check_answer),
        )
        .route(
            "/problems/{id}/progress",
            get(handlers::problems::get_progress),
        )
        .route(
            "/problems/{id}/bookmark",
            get(handlers::problems::get_bookmark).post(handlers::problems::toggle_bookmark),
        )
        .route(
            "/problems/{id}/reports",
            post(handlers::problems::create_report),
        )
        .route(
            "/subtopics/{id}/problems",
            get(handlers::learner::list_subtopic_problems),
        )
        .route("/me/bookmarks", get(handlers::learner::list_bookmarks))
        .route("/me/stats", get(handlers::learner::get_stats))
}
