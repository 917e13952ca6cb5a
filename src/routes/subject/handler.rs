use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppState;
use crate::error::AppResult;
use crate::result::{DataResponse, ExecuteResponse, Paginate};
use crate::routes::{AppJson, AppQuery, ListParams};

use super::model::{CreateSubjectRequest, SubjectView, UpdateSubjectRequest};
use super::operation;

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateSubjectRequest>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::create(state.store.as_ref(), req).await.map(Json)
}

#[axum::debug_handler]
pub async fn find_all(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Paginate<SubjectView>>> {
    operation::find_all(state.store.as_ref(), params).await.map(Json)
}

#[axum::debug_handler]
pub async fn find_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<SubjectView>>> {
    operation::find_one(state.store.as_ref(), &id).await.map(Json)
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateSubjectRequest>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::update(state.store.as_ref(), &id, req).await.map(Json)
}

#[axum::debug_handler]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::remove(state.store.as_ref(), &id).await.map(Json)
}
