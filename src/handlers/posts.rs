use axum::{extract::State, Json};

use crate::app_state::AppState;
use crate::database::{InsertOutcome, UpdateOutcome};
use crate::error::Result;
use crate::handlers::{
    ApiPath, ApiQuery, DocumentBody, DocumentList, JsonPayload, StatusQuery, ValidatedObjectId,
};

pub async fn create_post(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<InsertOutcome>> {
    Ok(Json(state.post_service.create(payload).await?))
}

/// `GET /posts` and `GET /manage-posts`
pub async fn list_posts(State(state): State<AppState>) -> Result<DocumentList> {
    Ok(DocumentList(state.post_service.list().await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<DocumentBody> {
    let id = ValidatedObjectId::parse(&id)?;
    Ok(DocumentBody(state.post_service.get(id).await?))
}

/// `PATCH /manage-posts/{id}?status=approved|denied`
pub async fn moderate_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> Result<Json<UpdateOutcome>> {
    let id = ValidatedObjectId::parse(&id)?;
    let status = query.status.unwrap_or_default();
    Ok(Json(state.post_service.transition(id, &status).await?))
}
