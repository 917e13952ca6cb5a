use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppState;
use crate::error::AppResult;
use crate::models::GroupKind;
use crate::result::{DataResponse, ExecuteResponse, Paginate};
use crate::routes::{AppJson, AppQuery, ListParams, OneOrMany};

use super::model::{
    CreateUserLinkRequest, CreateUserRequest, UpdateUserRequest, UserLinkView, UserView,
};
use super::operation;

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateUserRequest>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::create(state.store.as_ref(), &state.config, req)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn find_all(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Paginate<UserView>>> {
    operation::find_all(state.store.as_ref(), params).await.map(Json)
}

#[axum::debug_handler]
pub async fn find_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<UserView>>> {
    operation::find_one(state.store.as_ref(), &id).await.map(Json)
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateUserRequest>,
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
pub async fn create_role_links(
    State(state): State<AppState>,
    AppJson(body): AppJson<OneOrMany<CreateUserLinkRequest>>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::create_links(state.store.as_ref(), GroupKind::Role, body.into_vec()?)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn create_rule_links(
    State(state): State<AppState>,
    AppJson(body): AppJson<OneOrMany<CreateUserLinkRequest>>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::create_links(state.store.as_ref(), GroupKind::Rule, body.into_vec()?)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn list_roles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<UserLinkView>>>> {
    operation::list_links(state.store.as_ref(), GroupKind::Role, &id)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn list_rules(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<UserLinkView>>>> {
    operation::list_links(state.store.as_ref(), GroupKind::Rule, &id)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn delete_role_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::delete_link(state.store.as_ref(), GroupKind::Role, &id)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn delete_rule_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::delete_link(state.store.as_ref(), GroupKind::Rule, &id)
        .await
        .map(Json)
}
