use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

/// Records request count and latency per method, route template and status.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(duration);

    response
}

const ID_COLLECTIONS: [&str; 2] = ["problems", "subtopics"];

/// Collapses problem ids and other dynamic segments into `{id}` so label
/// cardinality stays bounded.
fn normalize_path(path: &str) -> String {
    let mut normalized = Vec::new();
    let mut after_collection = false;

    for segment in path.split('/') {
        if after_collection && !segment.is_empty() {
            normalized.push("{id}");
            after_collection = false;
            continue;
        }
        after_collection = ID_COLLECTIONS.contains(&segment);

        if is_uuid_like(segment) || is_numeric_id(segment) {
            normalized.push("{id}");
        } else {
            normalized.push(segment);
        }
    }

    normalized.join("/")
}

fn is_uuid_like(s: &str) -> bool {
    s.len() == 36 && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn is_numeric_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_ids_are_collapsed() {
        assert_eq!(
            normalize_path("/api/v1/problems/LS-AL-001/check"),
            "/api/v1/problems/{id}/check"
        );
        assert_eq!(
            normalize_path("/api/v1/problems/geo_12/bookmark"),
            "/api/v1/problems/{id}/bookmark"
        );
        assert_eq!(normalize_path("/api/v1/problems/x"), "/api/v1/problems/{id}");
        assert_eq!(
            normalize_path("/api/v1/subtopics/pecahan/problems"),
            "/api/v1/subtopics/{id}/problems"
        );
    }

    #[test]
    fn static_paths_are_untouched() {
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/metrics"), "/metrics");
        assert_eq!(normalize_path("/api/v1/me/stats"), "/api/v1/me/stats");
    }

    #[test]
    fn uuid_and_numeric_segments_are_collapsed() {
        assert_eq!(
            normalize_path("/api/v1/reports/550e8400-e29b-41d4-a716-446655440000"),
            "/api/v1/reports/{id}"
        );
        assert_eq!(normalize_path("/api/v1/items/123"), "/api/v1/items/{id}");
        assert!(!is_uuid_like("not-a-uuid"));
        assert!(!is_numeric_id(""));
    }
}
