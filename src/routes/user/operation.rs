use std::collections::HashSet;

use crate::config::Config;
use crate::database::{SoftDeletable, Store};
use crate::error::{AppError, AppResult};
use crate::models::{GroupKind, LifecycleStatus, NewUser, NewUserLink, UserRecord, resolve_status};
use crate::result::{DataResponse, ExecuteResponse, Paginate};
use crate::routes::group::operation::resolve_group;
use crate::routes::{ListParams, not_found};
use crate::utils::{generate_public_id, hash_password, messages};

use super::model::{
    CreateUserLinkRequest, CreateUserRequest, UpdateUserRequest, UserLinkView, UserView,
};

pub async fn resolve_user(store: &dyn Store, uuid: &str) -> AppResult<UserRecord> {
    store
        .find_user(uuid)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::ID_NOT_FOUND.into()))
}

pub async fn create(
    store: &dyn Store,
    config: &Config,
    req: CreateUserRequest,
) -> AppResult<ExecuteResponse> {
    req.validate()?;

    if store.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict(messages::EMAIL_FOUND.into()));
    }

    let status = resolve_status(store, LifecycleStatus::Active).await?;
    let password = req
        .password
        .as_deref()
        .unwrap_or(&config.default_user_password);
    let password_hash = hash_password(password, config.bcrypt_cost)?;

    let uuid = generate_public_id();
    store
        .insert_user(NewUser {
            uuid: uuid.clone(),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            address: req.address,
            phone_number1: req.phone_number1,
            phone_number2: req.phone_number2,
            is_full_time: req.is_full_time,
            net_salary_per_month: req.net_salary_per_month,
            net_salary_per_hour: req.net_salary_per_hour,
            monthly_working_hour: req.monthly_working_hour,
            // 管理员只能由启动配置创建
            is_admin: false,
            password_hash,
            status_id: status.id,
        })
        .await?;

    tracing::info!("created user {}", uuid);
    Ok(ExecuteResponse::ok())
}

pub async fn find_all(store: &dyn Store, params: ListParams) -> AppResult<Paginate<UserView>> {
    let query = params.to_query(store).await?;
    let page = store.list_users(&query).await?;

    Ok(Paginate::new(
        page.rows.into_iter().map(UserView::from).collect(),
        page.total,
        params.page,
    ))
}

pub async fn find_one(store: &dyn Store, uuid: &str) -> AppResult<DataResponse<UserView>> {
    let user = resolve_user(store, uuid).await?;
    Ok(DataResponse::new(UserView::from(user)))
}

pub async fn update(
    store: &dyn Store,
    uuid: &str,
    req: UpdateUserRequest,
) -> AppResult<ExecuteResponse> {
    req.validate()?;
    let user = resolve_user(store, uuid).await?;

    if let Some(email) = req.email.as_deref().filter(|email| *email != user.email) {
        if store.find_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(messages::EMAIL_FOUND.into()));
        }
    }

    store.update_user(user.id, req.into()).await?;
    tracing::info!("updated user {}", uuid);
    Ok(ExecuteResponse::ok())
}

pub async fn remove(store: &dyn Store, uuid: &str) -> AppResult<ExecuteResponse> {
    let user = resolve_user(store, uuid).await?;
    let deleted = resolve_status(store, LifecycleStatus::Deleted).await?;

    store
        .set_status(SoftDeletable::User, user.id, deleted.id)
        .await?;
    tracing::info!("soft-deleted user {}", uuid);
    Ok(ExecuteResponse::ok())
}

/// Every element is resolved and checked before anything is written; the
/// batch then lands in one write.
pub async fn create_links(
    store: &dyn Store,
    kind: GroupKind,
    items: Vec<CreateUserLinkRequest>,
) -> AppResult<ExecuteResponse> {
    let mut links = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();

    for item in items {
        let user = store
            .find_user(&item.user_id)
            .await?
            .ok_or_else(|| not_found("User", &item.user_id))?;
        let group = resolve_group(store, kind, &item.group_id).await?;

        if !seen.insert((user.id, group.id)) || store.user_link_exists(user.id, group.id).await? {
            return Err(AppError::Conflict(format!(
                "This {kind} is already added to the user."
            )));
        }

        links.push(NewUserLink {
            uuid: generate_public_id(),
            user_id: user.id,
            group_id: group.id,
        });
    }

    let count = links.len();
    store.insert_user_links(links).await?;
    tracing::info!("linked {} {}(s) to users", count, kind);
    Ok(ExecuteResponse::ok())
}

pub async fn list_links(
    store: &dyn Store,
    kind: GroupKind,
    user_uuid: &str,
) -> AppResult<DataResponse<Vec<UserLinkView>>> {
    let user = resolve_user(store, user_uuid).await?;
    let rows = store.list_user_links(kind, user.id).await?;
    Ok(DataResponse::new(
        rows.into_iter().map(UserLinkView::from).collect(),
    ))
}

pub async fn delete_link(
    store: &dyn Store,
    kind: GroupKind,
    link_uuid: &str,
) -> AppResult<ExecuteResponse> {
    let link = store
        .find_user_link(kind, link_uuid)
        .await?
        .ok_or_else(|| not_found(&format!("User {kind}"), link_uuid))?;

    store.delete_user_link(link.id).await?;
    tracing::info!("removed user {} link {}", kind, link_uuid);
    Ok(ExecuteResponse::ok())
}

/// Creates the configured administrator when no user holds its email yet.
pub async fn ensure_admin(store: &dyn Store, config: &Config) -> AppResult<()> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    if store.find_user_by_email(email).await?.is_some() {
        tracing::debug!("administrator {} already present", email);
        return Ok(());
    }

    let status = resolve_status(store, LifecycleStatus::Active).await?;
    store
        .insert_user(NewUser {
            uuid: generate_public_id(),
            first_name: "System".into(),
            last_name: "Administrator".into(),
            email: email.clone(),
            address: "-".into(),
            phone_number1: "-".into(),
            phone_number2: None,
            is_full_time: true,
            net_salary_per_month: None,
            net_salary_per_hour: None,
            monthly_working_hour: None,
            is_admin: true,
            password_hash: hash_password(password, config.bcrypt_cost)?,
            status_id: status.id,
        })
        .await?;

    tracing::info!("bootstrapped administrator {}", email);
    Ok(())
}
