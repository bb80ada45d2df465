use axum::{extract::State, Json};
use serde_json::Value;
use tracing::info;

use crate::app_state::AppState;
use crate::error::Result;
use crate::handlers::ApiJson;
use crate::models::TokenResponse;

/// Sign the supplied JSON object into a bearer token
pub async fn issue_token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<TokenResponse>> {
    let email = payload.get("email").and_then(Value::as_str).map(str::to_string);
    let token = state.jwt_service.issue_token(payload)?;

    info!(email = ?email, "Token issued");
    Ok(Json(TokenResponse { token }))
}
