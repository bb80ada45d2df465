//! Routes that require a bearer token and a role gate.
//!
//! Layers run outermost first: auth logging, credential verification, then
//! the role gate. The handler only runs when all three pass.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch},
    Router,
};

use crate::app_state::AppState;
use crate::auth::middleware::{auth_middleware, require_admin, require_member};
use crate::handlers::{groups, posts};
use crate::middleware::auth_logger_middleware;

/// Routes behind admin-gate.
pub fn admin_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        // Membership administration
        .route("/manage-member", get(groups::list_groups))
        .route("/manage-member/{id}", delete(groups::remove_member))
        // Post moderation
        .route("/manage-posts", get(posts::list_posts))
        .route("/manage-posts/{id}", patch(posts::moderate_post))
        // Group administration
        .route("/manage-group/edit/{id}", patch(groups::edit_group))
        .route("/manage-group/{id}", delete(groups::delete_group))
        .route_layer(from_fn_with_state(app_state.clone(), require_admin))
        .route_layer(from_fn_with_state(app_state, auth_middleware))
        .route_layer(from_fn(auth_logger_middleware))
}

/// Routes behind member-gate.
pub fn member_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/member/groups", get(groups::list_groups))
        .route_layer(from_fn_with_state(app_state.clone(), require_member))
        .route_layer(from_fn_with_state(app_state, auth_middleware))
        .route_layer(from_fn(auth_logger_middleware))
}
