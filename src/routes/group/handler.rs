use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::AppState;
use crate::error::AppResult;
use crate::models::GroupKind;
use crate::result::{DataResponse, ExecuteResponse, Paginate};
use crate::routes::{AppJson, AppQuery, ListParams, OneOrMany};

use super::model::{
    CreateGroupRequest, CreateMenuLinkRequest, GroupView, MenuLinkView, UpdateGroupRequest,
    UpdatePrivilegeRequest,
};
use super::operation;

// 角色和规则共用同一组 handler，路由层通过 Extension 注入 GroupKind

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Extension(kind): Extension<GroupKind>,
    AppJson(req): AppJson<CreateGroupRequest>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::create(state.store.as_ref(), kind, req).await.map(Json)
}

#[axum::debug_handler]
pub async fn find_all(
    State(state): State<AppState>,
    Extension(kind): Extension<GroupKind>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Paginate<GroupView>>> {
    operation::find_all(state.store.as_ref(), kind, params)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn find_one(
    State(state): State<AppState>,
    Extension(kind): Extension<GroupKind>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<GroupView>>> {
    operation::find_one(state.store.as_ref(), kind, &id)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Extension(kind): Extension<GroupKind>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateGroupRequest>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::update(state.store.as_ref(), kind, &id, req)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn remove(
    State(state): State<AppState>,
    Extension(kind): Extension<GroupKind>,
    Path(id): Path<String>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::remove(state.store.as_ref(), kind, &id)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn create_menu_links(
    State(state): State<AppState>,
    Extension(kind): Extension<GroupKind>,
    AppJson(body): AppJson<OneOrMany<CreateMenuLinkRequest>>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::create_menu_links(state.store.as_ref(), kind, body.into_vec()?)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn update_privileges(
    State(state): State<AppState>,
    Extension(kind): Extension<GroupKind>,
    AppJson(body): AppJson<OneOrMany<UpdatePrivilegeRequest>>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::update_privileges(state.store.as_ref(), kind, body.into_vec()?)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn list_menu_links(
    State(state): State<AppState>,
    Extension(kind): Extension<GroupKind>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<MenuLinkView>>>> {
    operation::list_menu_links(state.store.as_ref(), kind, &id)
        .await
        .map(Json)
}

#[axum::debug_handler]
pub async fn delete_menu_link(
    State(state): State<AppState>,
    Extension(kind): Extension<GroupKind>,
    Path(id): Path<String>,
) -> AppResult<Json<ExecuteResponse>> {
    operation::delete_menu_link(state.store.as_ref(), kind, &id)
        .await
        .map(Json)
}
