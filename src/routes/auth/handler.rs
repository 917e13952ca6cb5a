use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::infrastructure::bearer_token;
use crate::result::ExecuteResponse;
use crate::routes::AppJson;
use crate::utils::messages;

use super::model::{LoginRequest, LoginResponse};
use super::operation;

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    operation::login(state.store.as_ref(), &state.guard, req)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ExecuteResponse>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized(messages::TOKEN_MISSING.into()))?;
    operation::logout(&state.guard, &token).await.map(Json)
}

#[axum::debug_handler]
pub async fn test_token() -> Json<ExecuteResponse> {
    Json(operation::test_token())
}
