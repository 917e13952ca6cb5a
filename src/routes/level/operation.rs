use std::collections::HashSet;

use crate::database::{SoftDeletable, Store};
use crate::error::{AppError, AppResult};
use crate::models::{
    LevelChanges, LevelRecord, LifecycleStatus, NewLevel, NewSubjectLevel, SubjectLevelChanges,
    resolve_status,
};
use crate::result::{DataResponse, ExecuteResponse, Paginate};
use crate::routes::subject::operation::resolve_subject;
use crate::routes::{ListParams, StatusParams, not_found, require_text};
use crate::utils::generate_public_id;

use super::model::{
    CreateLevelRequest, CreateSubjectLevelRequest, LevelView, SubjectLevelView,
    UpdateLevelRequest, UpdateSubjectLevelRequest, validate_coefficient,
};

pub async fn resolve_level(store: &dyn Store, uuid: &str) -> AppResult<LevelRecord> {
    store
        .find_level(uuid)
        .await?
        .ok_or_else(|| not_found("Level", uuid))
}

/// Internal key of an optional teacher given by public id.
async fn resolve_teacher(store: &dyn Store, uuid: Option<&str>) -> AppResult<Option<i64>> {
    let Some(uuid) = uuid else {
        return Ok(None);
    };
    let teacher = store
        .find_user(uuid)
        .await?
        .ok_or_else(|| not_found("Teacher", uuid))?;
    Ok(Some(teacher.id))
}

pub async fn create(store: &dyn Store, req: CreateLevelRequest) -> AppResult<ExecuteResponse> {
    require_text("designation", &req.designation)?;
    let teacher_in_charge_id = resolve_teacher(store, req.teacher_in_charge_id.as_deref()).await?;
    let status = resolve_status(store, LifecycleStatus::Active).await?;

    let uuid = generate_public_id();
    store
        .insert_level(NewLevel {
            uuid: uuid.clone(),
            designation: req.designation,
            teacher_in_charge_id,
            status_id: status.id,
        })
        .await?;

    tracing::info!("created level {}", uuid);
    Ok(ExecuteResponse::ok())
}

pub async fn find_all(store: &dyn Store, params: ListParams) -> AppResult<Paginate<LevelView>> {
    let query = params.to_query(store).await?;
    let page = store.list_levels(&query).await?;

    Ok(Paginate::new(
        page.rows.into_iter().map(LevelView::from).collect(),
        page.total,
        params.page,
    ))
}

pub async fn find_one(store: &dyn Store, uuid: &str) -> AppResult<DataResponse<LevelView>> {
    let level = resolve_level(store, uuid).await?;
    Ok(DataResponse::new(LevelView::from(level)))
}

pub async fn update(
    store: &dyn Store,
    uuid: &str,
    req: UpdateLevelRequest,
) -> AppResult<ExecuteResponse> {
    if let Some(designation) = &req.designation {
        require_text("designation", designation)?;
    }
    let level = resolve_level(store, uuid).await?;
    let teacher_in_charge_id = resolve_teacher(store, req.teacher_in_charge_id.as_deref()).await?;

    store
        .update_level(
            level.id,
            LevelChanges {
                designation: req.designation,
                teacher_in_charge_id,
            },
        )
        .await?;
    tracing::info!("updated level {}", uuid);
    Ok(ExecuteResponse::ok())
}

pub async fn remove(store: &dyn Store, uuid: &str) -> AppResult<ExecuteResponse> {
    let level = resolve_level(store, uuid).await?;
    let deleted = resolve_status(store, LifecycleStatus::Deleted).await?;

    store
        .set_status(SoftDeletable::Level, level.id, deleted.id)
        .await?;
    tracing::info!("soft-deleted level {}", uuid);
    Ok(ExecuteResponse::ok())
}

pub async fn create_subject_links(
    store: &dyn Store,
    items: Vec<CreateSubjectLevelRequest>,
) -> AppResult<ExecuteResponse> {
    let status = resolve_status(store, LifecycleStatus::Active).await?;
    let mut links = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();

    for item in items {
        validate_coefficient(item.coefficient)?;
        let level = resolve_level(store, &item.level_id).await?;
        let subject = resolve_subject(store, &item.subject_id).await?;
        let teacher_id = resolve_teacher(store, item.teacher_id.as_deref()).await?;

        if !seen.insert((level.id, subject.id))
            || store.subject_level_exists(level.id, subject.id).await?
        {
            return Err(AppError::Conflict(format!(
                "Subject {} is already added to level {}.",
                subject.designation, level.designation
            )));
        }

        links.push(NewSubjectLevel {
            uuid: generate_public_id(),
            level_id: level.id,
            subject_id: subject.id,
            teacher_id,
            coefficient: item.coefficient,
            status_id: status.id,
        });
    }

    let count = links.len();
    store.insert_subject_levels(links).await?;
    tracing::info!("added {} subject(s) to levels", count);
    Ok(ExecuteResponse::ok())
}

pub async fn list_subject_links(
    store: &dyn Store,
    level_uuid: &str,
    params: StatusParams,
) -> AppResult<DataResponse<Vec<SubjectLevelView>>> {
    let level = resolve_level(store, level_uuid).await?;
    let status =
        resolve_status(store, LifecycleStatus::from_filter(params.status.as_deref())).await?;

    let rows = store.list_subject_levels(level.id, &status.code).await?;
    Ok(DataResponse::new(
        rows.into_iter().map(SubjectLevelView::from).collect(),
    ))
}

pub async fn update_subject_link(
    store: &dyn Store,
    link_uuid: &str,
    req: UpdateSubjectLevelRequest,
) -> AppResult<ExecuteResponse> {
    if let Some(coefficient) = req.coefficient {
        validate_coefficient(coefficient)?;
    }
    let link = store
        .find_subject_level(link_uuid)
        .await?
        .ok_or_else(|| not_found("Subject level", link_uuid))?;
    let teacher_id = resolve_teacher(store, req.teacher_id.as_deref()).await?;

    store
        .update_subject_level(
            link.id,
            SubjectLevelChanges {
                coefficient: req.coefficient,
                teacher_id,
            },
        )
        .await?;
    Ok(ExecuteResponse::ok())
}

pub async fn delete_subject_link(store: &dyn Store, link_uuid: &str) -> AppResult<ExecuteResponse> {
    let link = store
        .find_subject_level(link_uuid)
        .await?
        .ok_or_else(|| not_found("Subject level", link_uuid))?;

    store.delete_subject_level(link.id).await?;
    tracing::info!("removed subject level link {}", link_uuid);
    Ok(ExecuteResponse::ok())
}
