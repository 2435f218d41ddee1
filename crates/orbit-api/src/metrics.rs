//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "orbit_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "orbit_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "orbit_http_requests_in_flight";
}

/// Label for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Record an HTTP request.
pub fn record_http_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Route template the request matched, so each route is one label value.
pub fn route_label<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// Metrics middleware.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let route = route_label(&request);
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn label_for(uri: &str) -> String {
        let app = Router::new()
            .route("/allJobs/:id", get(|req: Request<Body>| async move { route_label(&req) }))
            .fallback(|req: Request<Body>| async move { route_label(&req) });

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_route_label_is_template() {
        assert_eq!(label_for("/allJobs/65a1f0c2e4b0a1b2c3d4e5f6").await, "/allJobs/:id");
        assert_eq!(label_for("/allJobs/anything-at-all").await, "/allJobs/:id");
    }

    #[tokio::test]
    async fn test_unknown_paths_share_one_label() {
        assert_eq!(label_for("/random-1").await, UNMATCHED_ROUTE);
        assert_eq!(label_for("/random-2/deeper").await, UNMATCHED_ROUTE);
    }
}
