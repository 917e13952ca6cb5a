use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppState;
use crate::error::AppResult;
use crate::result::{DataResponse, ExecuteResponse, Paginate};
use crate::routes::{AppJson, AppQuery, ListParams, OneOrMany, StatusParams};

use super::model::{
    CreateLevelRequest, CreateSubjectLevelRequest, LevelView, SubjectLevelView,
    UpdateLevelRequest, UpdateSubjectLevelRequest,
};
use super::operation;

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateLevelRequest>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::create(state.store.as_ref(), req).await.map(Json)
}

#[axum::debug_handler]
pub async fn find_all(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Paginate<LevelView>>> {
    operation::find_all(state.store.as_ref(), params).await.map(Json)
}

#[axum::debug_handler]
pub async fn find_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<LevelView>>> {
    operation::find_one(state.store.as_ref(), &id).await.map(Json)
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateLevelRequest>,
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

#[axum::debug_handler]
pub async fn create_subject_links(
    State(state): State<AppState>,
    AppJson(body): AppJson<OneOrMany<CreateSubjectLevelRequest>>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::create_subject_links(state.store.as_ref(), body.into_vec()?)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn list_subject_links(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<StatusParams>,
) -> AppResult<Json<DataResponse<Vec<SubjectLevelView>>>> {
    operation::list_subject_links(state.store.as_ref(), &id, params)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn update_subject_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateSubjectLevelRequest>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::update_subject_link(state.store.as_ref(), &id, req)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn delete_subject_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::delete_subject_link(state.store.as_ref(), &id)
        .await
        .map(Json)
}
