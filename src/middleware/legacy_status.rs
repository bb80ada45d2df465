//! Compatibility mode for clients written against the old wire behaviour.
//!
//! Older clients expected store failures and rejected input to come back as
//! `200 OK` with the `{error, message}` body. When `LEGACY_ERROR_STATUS` is
//! enabled the status is rewritten here; the body is left untouched.
//! Credential (401) and gate (403) rejections always keep their status.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::app_state::AppState;

/// Whether a status is downgraded to 200 in legacy mode
pub fn is_rewritten(status: StatusCode) -> bool {
    status == StatusCode::BAD_REQUEST || status.is_server_error()
}

pub async fn legacy_status_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    if state.config.legacy_error_status && is_rewritten(response.status()) {
        debug!(status = %response.status(), "Rewriting error status for legacy client");
        *response.status_mut() = StatusCode::OK;
    }

    response
}
