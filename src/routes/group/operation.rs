use std::collections::HashSet;

use crate::database::{SoftDeletable, Store};
use crate::error::{AppError, AppResult};
use crate::models::{
    GroupKind, GroupRecord, LifecycleStatus, NewGroup, NewMenuLink, resolve_status,
};
use crate::result::{DataResponse, ExecuteResponse, Paginate};
use crate::routes::{ListParams, not_found, require_text};
use crate::utils::generate_public_id;

use super::model::{
    CreateGroupRequest, CreateMenuLinkRequest, GroupView, MenuLinkView, UpdateGroupRequest,
    UpdatePrivilegeRequest,
};

pub async fn resolve_group(store: &dyn Store, kind: GroupKind, uuid: &str) -> AppResult<GroupRecord> {
    store
        .find_group(kind, uuid)
        .await?
        .ok_or_else(|| not_found(kind.label(), uuid))
}

pub async fn create(
    store: &dyn Store,
    kind: GroupKind,
    req: CreateGroupRequest,
) -> AppResult<ExecuteResponse> {
    require_text("designation", &req.designation)?;
    let status = resolve_status(store, LifecycleStatus::Active).await?;

    let uuid = generate_public_id();
    store
        .insert_group(NewGroup {
            uuid: uuid.clone(),
            kind,
            designation: req.designation,
            status_id: status.id,
        })
        .await?;

    tracing::info!("created {} {}", kind, uuid);
    Ok(ExecuteResponse::ok())
}

pub async fn find_all(
    store: &dyn Store,
    kind: GroupKind,
    params: ListParams,
) -> AppResult<Paginate<GroupView>> {
    let query = params.to_query(store).await?;
    let page = store.list_groups(kind, &query).await?;

    Ok(Paginate::new(
        page.rows.into_iter().map(GroupView::from).collect(),
        page.total,
        params.page,
    ))
}

pub async fn find_one(
    store: &dyn Store,
    kind: GroupKind,
    uuid: &str,
) -> AppResult<DataResponse<GroupView>> {
    let group = resolve_group(store, kind, uuid).await?;
    Ok(DataResponse::new(GroupView::from(group)))
}

pub async fn update(
    store: &dyn Store,
    kind: GroupKind,
    uuid: &str,
    req: UpdateGroupRequest,
) -> AppResult<ExecuteResponse> {
    if let Some(designation) = &req.designation {
        require_text("designation", designation)?;
    }
    let group = resolve_group(store, kind, uuid).await?;

    store.update_group(group.id, req.designation).await?;
    tracing::info!("updated {} {}", kind, uuid);
    Ok(ExecuteResponse::ok())
}

pub async fn remove(store: &dyn Store, kind: GroupKind, uuid: &str) -> AppResult<ExecuteResponse> {
    let group = resolve_group(store, kind, uuid).await?;
    let deleted = resolve_status(store, LifecycleStatus::Deleted).await?;

    store
        .set_status(SoftDeletable::Group, group.id, deleted.id)
        .await?;
    tracing::info!("soft-deleted {} {}", kind, uuid);
    Ok(ExecuteResponse::ok())
}

/// Resolves and checks every element first; the batch is written in one go.
pub async fn create_menu_links(
    store: &dyn Store,
    kind: GroupKind,
    items: Vec<CreateMenuLinkRequest>,
) -> AppResult<ExecuteResponse> {
    let mut links = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();

    for item in items {
        let group = resolve_group(store, kind, &item.group_id).await?;
        let menu = store
            .find_menu(&item.menu_id)
            .await?
            .ok_or_else(|| not_found("Menu", &item.menu_id))?;

        if !seen.insert((menu.id, group.id)) || store.menu_link_exists(menu.id, group.id).await? {
            return Err(AppError::Conflict(format!(
                "Menu {} is already added to this {kind}.",
                menu.designation
            )));
        }

        links.push(NewMenuLink {
            uuid: generate_public_id(),
            menu_id: menu.id,
            group_id: group.id,
            privilege: item.privilege,
        });
    }

    let count = links.len();
    store.insert_menu_links(links).await?;
    tracing::info!("granted {} menu link(s) to {}s", count, kind);
    Ok(ExecuteResponse::ok())
}

pub async fn update_privileges(
    store: &dyn Store,
    kind: GroupKind,
    items: Vec<UpdatePrivilegeRequest>,
) -> AppResult<ExecuteResponse> {
    let mut updates = Vec::with_capacity(items.len());

    for item in items {
        let link = store
            .find_menu_link(kind, &item.menu_link_id)
            .await?
            .ok_or_else(|| not_found(&format!("Menu {}", kind.label()), &item.menu_link_id))?;
        updates.push((link.id, item.privilege));
    }

    store.update_menu_privileges(updates).await?;
    Ok(ExecuteResponse::ok())
}

pub async fn list_menu_links(
    store: &dyn Store,
    kind: GroupKind,
    group_uuid: &str,
) -> AppResult<DataResponse<Vec<MenuLinkView>>> {
    let group = resolve_group(store, kind, group_uuid).await?;
    let rows = store.list_menu_links(group.id).await?;
    Ok(DataResponse::new(
        rows.into_iter().map(MenuLinkView::from).collect(),
    ))
}

pub async fn delete_menu_link(
    store: &dyn Store,
    kind: GroupKind,
    link_uuid: &str,
) -> AppResult<ExecuteResponse> {
    let link = store
        .find_menu_link(kind, link_uuid)
        .await?
        .ok_or_else(|| not_found(&format!("Menu {}", kind.label()), link_uuid))?;

    store.delete_menu_link(link.id).await?;
    tracing::info!("removed menu {} link {}", kind, link_uuid);
    Ok(ExecuteResponse::ok())
}
