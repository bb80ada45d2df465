//! Public routes that don't require authentication.
//!
//! Includes: liveness, health, metrics, token issuance, users, groups, posts, comments.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::app_state::AppState;
use crate::handlers::{self, auth as auth_handlers, comments, groups, health, posts, users};

/// Build public routes that don't require authentication.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // Health check routes
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(handlers::metrics::get_prometheus_metrics))
        // Token issuance
        .route("/jwt", post(auth_handlers::issue_token))
        // User registry
        .route("/users", post(users::register))
        .route("/users/{email}", get(users::get_role))
        // Groups
        .route("/groups", get(groups::list_groups))
        .route("/groups/{email}", post(groups::create_group))
        .route("/group/{id}", get(groups::get_group))
        .route("/join-groups/{id}", patch(groups::join_group))
        // Posts
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/post/{id}", get(posts::get_post))
        // Comments
        .route(
            "/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
}
