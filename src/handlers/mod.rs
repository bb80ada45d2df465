// HTTP handlers
// Thin adapters between axum extractors and the services in AppState

pub mod auth;
pub mod comments;
pub mod extractors;
pub mod groups;
pub mod health;
pub mod metrics;
pub mod posts;
pub mod response;
pub mod users;

pub use extractors::{
    ApiJson, ApiPath, ApiQuery, JsonPayload, RemoveMemberQuery, StatusQuery, ValidatedObjectId,
};
pub use response::{DocumentBody, DocumentList};
