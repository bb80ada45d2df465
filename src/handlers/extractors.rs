//! Common extractors for API handlers.
//!
//! Request bodies are free-form JSON objects; path ids are 24-hex ObjectIds.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use bson::{oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::ApiError;
use crate::models::{json_to_document, require_object};

/// Validated ObjectId helper
///
/// # Example
/// ```ignore
/// let id = ValidatedObjectId::parse(&id_string)?;
/// ```
pub struct ValidatedObjectId;

impl ValidatedObjectId {
    /// Parse a 24-hex string into an ObjectId, returning an ApiError on failure
    pub fn parse(s: &str) -> Result<ObjectId, ApiError> {
        ObjectId::parse_str(s).map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", s)))
    }
}

/// `Json` whose rejections go through [`ApiError`]
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// `Path` whose rejections go through [`ApiError`]
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(ApiPath(value))
    }
}

/// `Query` whose rejections go through [`ApiError`]
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

/// A JSON object body converted to a store document
#[derive(Debug, Clone)]
pub struct JsonPayload(pub Document);

impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(value) = ApiJson::<serde_json::Value>::from_request(req, state).await?;
        let document = json_to_document(require_object(value)?)?;
        Ok(JsonPayload(document))
    }
}

/// Query of `DELETE /manage-member/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveMemberQuery {
    /// Membership entry id; older clients send it as `groupId`
    #[serde(rename = "memberId", alias = "groupId")]
    pub member_id: Option<String>,
}

impl RemoveMemberQuery {
    pub fn member_id(&self) -> Result<ObjectId, ApiError> {
        let raw = self
            .member_id
            .as_deref()
            .ok_or_else(|| ApiError::BadRequest("memberId query parameter is required".into()))?;
        ValidatedObjectId::parse(raw)
    }
}

/// Query of `PATCH /manage-posts/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}
