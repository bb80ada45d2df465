use axum::{extract::State, Json};

use crate::app_state::AppState;
use crate::error::Result;
use crate::handlers::{ApiPath, JsonPayload};
use crate::models::{RegisterOutcome, RoleView};

/// `GET /users/{email}`
pub async fn get_role(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> Result<Json<RoleView>> {
    Ok(Json(state.user_service.role_of(&email).await?))
}

/// `POST /users`
pub async fn register(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<RegisterOutcome>> {
    Ok(Json(state.user_service.register(payload).await?))
}
