//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "jobboard_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jobboard_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "jobboard_http_requests_in_flight";

    pub const SESSIONS_ISSUED_TOTAL: &str = "jobboard_sessions_issued_total";
    pub const APPLICATIONS_SUBMITTED_TOTAL: &str = "jobboard_applications_submitted_total";
}

/// Label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Record an HTTP request. `path` is a route template, never a raw URI.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a session token issued by `POST /jwt`.
pub fn record_session_issued() {
    counter!(names::SESSIONS_ISSUED_TOTAL).increment(1);
}

/// Record an accepted application.
pub fn record_application_submitted() {
    counter!(names::APPLICATIONS_SUBMITTED_TOTAL).increment(1);
}

/// Path label for a request: the matched route template, so label
/// cardinality is bounded by the route table.
pub fn path_label<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string())
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = path_label(&request);
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
