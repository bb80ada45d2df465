// Business logic services
// Group membership, post moderation, user registry and comments

pub mod comment_service;
pub mod group_service;
pub mod post_service;
pub mod user_service;

pub use comment_service::CommentService;
pub use group_service::GroupService;
pub use post_service::{ModerationDecision, PostService};
pub use user_service::UserService;
