use axum::{extract::Request, middleware::Next, response::Response};
use metrics::{counter, gauge, histogram};
use std::time::Instant;

/// Metrics middleware that tracks request metrics
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    counter!("http_requests_total", "method" => method.to_string(), "path" => path.clone())
        .increment(1);
    gauge!("http_requests_in_flight").increment(1.0);

    let response = next.run(request).await;

    let status = response.status();
    let duration = start.elapsed();

    gauge!("http_requests_in_flight").decrement(1.0);

    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .record(duration.as_secs_f64());

    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    if status.is_server_error() {
        counter!(
            "http_errors_total",
            "method" => method.to_string(),
            "path" => path,
            "status" => status.as_u16().to_string()
        )
        .increment(1);
    }

    response
}

/// Track authentication and authorization failures
pub fn track_auth_failure(reason: &str) {
    counter!("auth_failures_total", "reason" => reason.to_string()).increment(1);
}

/// Track a user promoted to admin by group creation
pub fn track_group_promotion(rolled_back: bool) {
    counter!("group_promotions_total", "rolled_back" => rolled_back.to_string()).increment(1);
}

/// Track a moderation decision applied to a post
pub fn track_moderation_decision(decision: &str) {
    counter!("moderation_decisions_total", "decision" => decision.to_string()).increment(1);
}
