use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod jwt;
pub mod middleware;
pub mod roles;

pub use jwt::JwtService;
pub use middleware::{AuthenticatedUser, Gate};
pub use roles::{ResolvedRole, Role, RoleResolver};

/// Decoded bearer-token claim set.
///
/// Issuance signs whatever object the caller supplies, so everything other
/// than the email and the registered time claims is kept verbatim in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
