//! Router configuration module
//!
//! Public routes plus two gated groups: admin-gate and member-gate.

use axum::{middleware::from_fn, middleware::from_fn_with_state, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app_state::AppState;
use crate::middleware::{legacy_status_middleware, metrics_middleware, request_logger_middleware};

pub mod protected;
pub mod public;

pub use protected::{admin_routes, member_routes};
pub use public::public_routes;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    public_routes()
        .merge(admin_routes(app_state.clone()))
        .merge(member_routes(app_state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(from_fn_with_state(app_state.clone(), legacy_status_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(request_logger_middleware))
                .layer(from_fn(metrics_middleware)),
        )
        .with_state(app_state)
}
