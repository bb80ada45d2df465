//! Application state shared across all handlers.
//!
//! Holds the injected document store and the services built on top of it.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::auth::{JwtService, RoleResolver};
use crate::config::Config;
use crate::database::DocumentStore;
use crate::services::{CommentService, GroupService, PostService, UserService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document store shared by every service
    pub store: Arc<dyn DocumentStore>,
    /// Application configuration
    pub config: Config,
    /// Bearer token issuance and verification
    pub jwt_service: JwtService,
    /// Fresh role lookups for the access gates
    pub role_resolver: RoleResolver,
    pub group_service: GroupService,
    pub post_service: PostService,
    pub user_service: UserService,
    pub comment_service: CommentService,
    /// Prometheus render handle, absent when no recorder was installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config, jwt_service: JwtService) -> Self {
        Self {
            role_resolver: RoleResolver::new(store.clone()),
            group_service: GroupService::new(store.clone()),
            post_service: PostService::new(store.clone()),
            user_service: UserService::new(store.clone()),
            comment_service: CommentService::new(store.clone()),
            store,
            config,
            jwt_service,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
