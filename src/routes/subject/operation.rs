use crate::database::{SoftDeletable, Store};
use crate::error::AppResult;
use crate::models::{LifecycleStatus, NewSubject, SubjectRecord, resolve_status};
use crate::result::{DataResponse, ExecuteResponse, Paginate};
use crate::routes::{ListParams, not_found, require_text};
use crate::utils::generate_public_id;

use super::model::{CreateSubjectRequest, SubjectView, UpdateSubjectRequest};

pub async fn resolve_subject(store: &dyn Store, uuid: &str) -> AppResult<SubjectRecord> {
    store
        .find_subject(uuid)
        .await?
        .ok_or_else(|| not_found("Subject", uuid))
}

pub async fn create(store: &dyn Store, req: CreateSubjectRequest) -> AppResult<ExecuteResponse> {
    require_text("designation", &req.designation)?;
    let status = resolve_status(store, LifecycleStatus::Active).await?;

    let uuid = generate_public_id();
    store
        .insert_subject(NewSubject {
            uuid: uuid.clone(),
            designation: req.designation,
            status_id: status.id,
        })
        .await?;

    tracing::info!("created subject {}", uuid);
    Ok(ExecuteResponse::ok())
}

pub async fn find_all(store: &dyn Store, params: ListParams) -> AppResult<Paginate<SubjectView>> {
    let query = params.to_query(store).await?;
    let page = store.list_subjects(&query).await?;

    Ok(Paginate::new(
        page.rows.into_iter().map(SubjectView::from).collect(),
        page.total,
        params.page,
    ))
}

pub async fn find_one(store: &dyn Store, uuid: &str) -> AppResult<DataResponse<SubjectView>> {
    let subject = resolve_subject(store, uuid).await?;
    Ok(DataResponse::new(SubjectView::from(subject)))
}

pub async fn update(
    store: &dyn Store,
    uuid: &str,
    req: UpdateSubjectRequest,
) -> AppResult<ExecuteResponse> {
    if let Some(designation) = &req.designation {
        require_text("designation", designation)?;
    }
    let subject = resolve_subject(store, uuid).await?;

    store.update_subject(subject.id, req.designation).await?;
    tracing::info!("updated subject {}", uuid);
    Ok(ExecuteResponse::ok())
}

pub async fn remove(store: &dyn Store, uuid: &str) -> AppResult<ExecuteResponse> {
    let subject = resolve_subject(store, uuid).await?;
    let deleted = resolve_status(store, LifecycleStatus::Deleted).await?;

    store
        .set_status(SoftDeletable::Subject, subject.id, deleted.id)
        .await?;
    tracing::info!("soft-deleted subject {}", uuid);
    Ok(ExecuteResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::error::AppError;

    async fn first_uuid(store: &MemoryStore, status: &str) -> Option<String> {
        let params = ListParams {
            status: Some(status.into()),
            ..Default::default()
        };
        find_all(store, params)
            .await
            .unwrap()
            .data
            .into_iter()
            .next()
            .map(|s| s.uuid)
    }

    #[tokio::test]
    async fn remove_moves_subject_to_deleted_listing() {
        let store = MemoryStore::new();
        create(&store, CreateSubjectRequest { designation: "Physics".into() })
            .await
            .unwrap();
        let uuid = first_uuid(&store, "ACT").await.unwrap();

        remove(&store, &uuid).await.unwrap();

        assert_eq!(first_uuid(&store, "ACT").await, None);
        assert_eq!(first_uuid(&store, "SPR").await, Some(uuid.clone()));
        // the row is still reachable by id
        let found = find_one(&store, &uuid).await.unwrap();
        assert_eq!(found.data.status.code, "SPR");
    }

    #[tokio::test]
    async fn empty_update_changes_nothing() {
        let store = MemoryStore::new();
        create(&store, CreateSubjectRequest { designation: "Chemistry".into() })
            .await
            .unwrap();
        let uuid = first_uuid(&store, "ACT").await.unwrap();

        let response = update(&store, &uuid, UpdateSubjectRequest::default())
            .await
            .unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(find_one(&store, &uuid).await.unwrap().data.designation, "Chemistry");
    }

    #[tokio::test]
    async fn blank_designation_is_rejected() {
        let store = MemoryStore::new();
        let err = create(&store, CreateSubjectRequest { designation: "  ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
