use bson::{doc, Bson, Document};
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{Role, RoleResolver};
use crate::database::{Collection, DocumentStore, InsertOutcome};
use crate::error::{ApiError, Result};
use crate::models::{strip_fields, RegisterOutcome, RoleView};

/// Service for the user registry
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    role_resolver: RoleResolver,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            role_resolver: RoleResolver::new(store.clone()),
            store,
        }
    }

    /// Register a user unless one with the same email already exists.
    ///
    /// A user may sign up as a `member`; any other role and the `admin`
    /// flag are only granted by creating a group.
    pub async fn register(&self, payload: Document) -> Result<RegisterOutcome> {
        let email = payload
            .get_str("email")
            .map_err(|_| ApiError::BadRequest("email is required".into()))?
            .to_string();

        if self
            .store
            .find_one(Collection::Users, doc! { "email": email.as_str() })
            .await?
            .is_some()
        {
            debug!(email = %email, "User already registered");
            return Ok(RegisterOutcome::exists());
        }

        let mut user = payload;
        strip_fields(&mut user, &["_id", "admin"]);
        if !is_member_role(user.get("role")) {
            user.remove("role");
        }

        let id = self.store.insert_one(Collection::Users, user).await?;
        info!(email = %email, user_id = %id, "User registered");
        Ok(RegisterOutcome::Created(InsertOutcome::new(id)))
    }

    pub async fn role_of(&self, email: &str) -> Result<RoleView> {
        let resolved = self.role_resolver.resolve(Some(email)).await?;
        Ok(RoleView {
            role: resolved.role,
        })
    }
}

fn is_member_role(role: Option<&Bson>) -> bool {
    matches!(role, Some(Bson::String(role)) if role.as_str() == Role::Member.as_str())
}
