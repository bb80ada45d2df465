use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::app_state::AppState;
use crate::auth::{Claims, ResolvedRole, Role, RoleResolver};
use crate::error::{ApiError, Result};
use crate::middleware::metrics::track_auth_failure;

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT Authentication middleware
///
/// Verifies the bearer token and stores the decoded [`Claims`] in the request
/// extensions. Never consults the store.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let claims = {
        let token = bearer_token(request.headers()).ok_or_else(|| {
            track_auth_failure("missing_token");
            ApiError::MissingToken
        })?;

        state.jwt_service.decode_token(token).inspect_err(|_| {
            track_auth_failure("invalid_token");
        })?
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Named authorization predicates over a resolved role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// `admin` flag strictly true
    Admin,
    /// `role` strictly `"member"`; admins do not pass
    Member,
}

impl Gate {
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Admin => "admin-gate",
            Gate::Member => "member-gate",
        }
    }

    pub fn admits(&self, resolved: &ResolvedRole) -> bool {
        match self {
            Gate::Admin => resolved.admin,
            Gate::Member => resolved.role == Some(Role::Member),
        }
    }

    /// Resolve the subject's role and apply the predicate.
    pub async fn check(&self, resolver: &RoleResolver, claims: &Claims) -> Result<ResolvedRole> {
        let resolved = resolver.resolve(claims.email()).await?;
        if !self.admits(&resolved) {
            track_auth_failure(self.name());
            return Err(ApiError::Forbidden(format!(
                "{} rejected {}",
                self.name(),
                claims.email().unwrap_or("<no email>")
            )));
        }

        debug!(gate = self.name(), email = ?claims.email(), "Gate passed");
        Ok(resolved)
    }
}

/// admin-gate. Must be layered inside [`auth_middleware`].
pub async fn require_admin(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    request: Request<Body>,
    next: Next,
) -> Result<Response> {
    Gate::Admin.check(&state.role_resolver, &user.0).await?;
    Ok(next.run(request).await)
}

/// member-gate. Must be layered inside [`auth_middleware`].
pub async fn require_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    request: Request<Body>,
    next: Next,
) -> Result<Response> {
    Gate::Member.check(&state.role_resolver, &user.0).await?;
    Ok(next.run(request).await)
}

/// Extractor for authenticated user claims
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or(ApiError::MissingToken)?;

        Ok(AuthenticatedUser(claims))
    }
}
