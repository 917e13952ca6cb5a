// 数据库模块
// Store trait is the only way services touch persistence; Postgres serves
// production and the in-memory store backs tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    GroupKind, GroupRecord, LevelChanges, LevelRecord, MenuLinkRecord, MenuLinkRow, MenuRecord,
    NewGroup, NewLevel, NewMenuLink, NewSubject, NewSubjectLevel, NewUser, NewUserLink, Privilege,
    StatusRecord, SubjectLevelChanges, SubjectLevelRecord, SubjectLevelRow, SubjectRecord,
    UserChanges, UserLinkRecord, UserLinkRow, UserRecord,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Entities that carry a status reference and can be soft-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDeletable {
    User,
    Group,
    Level,
    Subject,
}

impl SoftDeletable {
    pub(crate) fn table(self) -> &'static str {
        match self {
            SoftDeletable::User => "users",
            SoftDeletable::Group => "permission_groups",
            SoftDeletable::Level => "levels",
            SoftDeletable::Subject => "subjects",
        }
    }
}

/// Filter and window for a listing. `limit`/`offset` are both absent for an unbounded fetch.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub keyword: String,
    pub status_code: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A page of rows plus the row count of the whole filter, read from one snapshot.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: i64,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_status(&self, code: &str) -> StoreResult<Option<StatusRecord>>;
    async fn set_status(&self, entity: SoftDeletable, id: i64, status_id: i64) -> StoreResult<()>;

    async fn find_user(&self, uuid: &str) -> StoreResult<Option<UserRecord>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;
    async fn insert_user(&self, user: NewUser) -> StoreResult<()>;
    async fn list_users(&self, query: &ListQuery) -> StoreResult<Page<UserRecord>>;
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<()>;

    async fn find_group(&self, kind: GroupKind, uuid: &str) -> StoreResult<Option<GroupRecord>>;
    async fn insert_group(&self, group: NewGroup) -> StoreResult<()>;
    async fn list_groups(&self, kind: GroupKind, query: &ListQuery)
    -> StoreResult<Page<GroupRecord>>;
    async fn update_group(&self, id: i64, designation: Option<String>) -> StoreResult<()>;

    async fn find_menu(&self, uuid: &str) -> StoreResult<Option<MenuRecord>>;
    async fn find_menu_link(&self, kind: GroupKind, uuid: &str)
    -> StoreResult<Option<MenuLinkRecord>>;
    async fn menu_link_exists(&self, menu_id: i64, group_id: i64) -> StoreResult<bool>;
    /// Inserts the whole batch or nothing.
    async fn insert_menu_links(&self, links: Vec<NewMenuLink>) -> StoreResult<()>;
    /// Overwrites every privilege in the batch or none.
    async fn update_menu_privileges(&self, updates: Vec<(i64, Privilege)>) -> StoreResult<()>;
    async fn list_menu_links(&self, group_id: i64) -> StoreResult<Vec<MenuLinkRow>>;
    async fn delete_menu_link(&self, id: i64) -> StoreResult<()>;

    async fn find_user_link(&self, kind: GroupKind, uuid: &str)
    -> StoreResult<Option<UserLinkRecord>>;
    async fn user_link_exists(&self, user_id: i64, group_id: i64) -> StoreResult<bool>;
    /// Inserts the whole batch or nothing.
    async fn insert_user_links(&self, links: Vec<NewUserLink>) -> StoreResult<()>;
    async fn list_user_links(&self, kind: GroupKind, user_id: i64) -> StoreResult<Vec<UserLinkRow>>;
    async fn delete_user_link(&self, id: i64) -> StoreResult<()>;

    async fn find_level(&self, uuid: &str) -> StoreResult<Option<LevelRecord>>;
    async fn insert_level(&self, level: NewLevel) -> StoreResult<()>;
    async fn list_levels(&self, query: &ListQuery) -> StoreResult<Page<LevelRecord>>;
    async fn update_level(&self, id: i64, changes: LevelChanges) -> StoreResult<()>;

    async fn find_subject(&self, uuid: &str) -> StoreResult<Option<SubjectRecord>>;
    async fn insert_subject(&self, subject: NewSubject) -> StoreResult<()>;
    async fn list_subjects(&self, query: &ListQuery) -> StoreResult<Page<SubjectRecord>>;
    async fn update_subject(&self, id: i64, designation: Option<String>) -> StoreResult<()>;

    async fn find_subject_level(&self, uuid: &str) -> StoreResult<Option<SubjectLevelRecord>>;
    async fn subject_level_exists(&self, level_id: i64, subject_id: i64) -> StoreResult<bool>;
    /// Inserts the whole batch or nothing.
    async fn insert_subject_levels(&self, links: Vec<NewSubjectLevel>) -> StoreResult<()>;
    async fn list_subject_levels(
        &self,
        level_id: i64,
        status_code: &str,
    ) -> StoreResult<Vec<SubjectLevelRow>>;
    async fn update_subject_level(&self, id: i64, changes: SubjectLevelChanges)
    -> StoreResult<()>;
    async fn delete_subject_level(&self, id: i64) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
}
