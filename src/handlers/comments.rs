use axum::{extract::State, Json};

use crate::app_state::AppState;
use crate::database::InsertOutcome;
use crate::error::Result;
use crate::handlers::{DocumentList, JsonPayload};

pub async fn create_comment(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<InsertOutcome>> {
    Ok(Json(state.comment_service.create(payload).await?))
}

pub async fn list_comments(State(state): State<AppState>) -> Result<DocumentList> {
    Ok(DocumentList(state.comment_service.list().await?))
}
