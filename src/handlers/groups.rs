use axum::{extract::State, Json};

use crate::app_state::AppState;
use crate::database::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::error::Result;
use crate::handlers::{
    ApiPath, ApiQuery, DocumentBody, DocumentList, JsonPayload, RemoveMemberQuery,
    ValidatedObjectId,
};
use crate::models::JoinOutcome;

/// `POST /groups/{email}`: create a group and promote its creator
pub async fn create_group(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<InsertOutcome>> {
    Ok(Json(state.group_service.create(&email, payload).await?))
}

/// `GET /groups`, `GET /manage-member` and `GET /member/groups`
pub async fn list_groups(State(state): State<AppState>) -> Result<DocumentList> {
    Ok(DocumentList(state.group_service.list().await?))
}

pub async fn get_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<DocumentBody> {
    let id = ValidatedObjectId::parse(&id)?;
    Ok(DocumentBody(state.group_service.get(id).await?))
}

pub async fn join_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<JoinOutcome>> {
    let id = ValidatedObjectId::parse(&id)?;
    Ok(Json(state.group_service.join(id, payload).await?))
}

/// `DELETE /manage-member/{id}?memberId=`
pub async fn remove_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(query): ApiQuery<RemoveMemberQuery>,
) -> Result<Json<UpdateOutcome>> {
    let id = ValidatedObjectId::parse(&id)?;
    let member_id = query.member_id()?;
    Ok(Json(state.group_service.remove_member(id, member_id).await?))
}

pub async fn edit_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<UpdateOutcome>> {
    let id = ValidatedObjectId::parse(&id)?;
    Ok(Json(state.group_service.edit(id, payload).await?))
}

pub async fn delete_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<DeleteOutcome>> {
    let id = ValidatedObjectId::parse(&id)?;
    Ok(Json(state.group_service.delete(id).await?))
}
