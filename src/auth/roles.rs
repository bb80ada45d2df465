//! Stored roles and their lookup.
//!
//! A user document carries two independent markers: the `role` string and
//! the boolean `admin` flag. Both are matched exactly; anything else counts
//! as no privilege.

use bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::database::{Collection, DocumentStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    /// Case-sensitive: `"Admin"` is not a role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct RoleParseError(String);

impl std::fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid role: {}", self.0)
    }
}

impl std::error::Error for RoleParseError {}

/// Privileges read from a user document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedRole {
    pub role: Option<Role>,
    pub admin: bool,
}

impl ResolvedRole {
    /// Subject with no user document
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn from_user(user: &Document) -> Self {
        let role = match user.get("role") {
            Some(Bson::String(role)) => role.parse().ok(),
            _ => None,
        };
        let admin = matches!(user.get("admin"), Some(Bson::Boolean(true)));
        Self { role, admin }
    }
}

/// Fresh per-check lookup of a user's stored privileges.
#[derive(Clone)]
pub struct RoleResolver {
    store: Arc<dyn DocumentStore>,
}

impl RoleResolver {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Resolve `email`; no email or no user document yields the absent role.
    pub async fn resolve(&self, email: Option<&str>) -> Result<ResolvedRole, StoreError> {
        let Some(email) = email else {
            return Ok(ResolvedRole::absent());
        };

        let user = self
            .store
            .find_one(Collection::Users, doc! { "email": email })
            .await?;

        Ok(user
            .as_ref()
            .map(ResolvedRole::from_user)
            .unwrap_or_else(ResolvedRole::absent))
    }
}
