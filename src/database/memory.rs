use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ListQuery, Page, SoftDeletable, Store, StoreError, StoreResult};
use crate::models::{
    GroupKind, GroupRecord, LevelChanges, LevelRecord, LifecycleStatus, MenuLinkRecord,
    MenuLinkRow, MenuRecord, NewGroup, NewLevel, NewMenuLink, NewSubject, NewSubjectLevel,
    NewUser, NewUserLink, Privilege, StatusRecord, StatusSummary, SubjectLevelChanges,
    SubjectLevelRecord, SubjectLevelRow, SubjectRecord, UserChanges, UserLinkRecord, UserLinkRow,
    UserRecord,
};
use crate::utils::{generate_public_id, messages};

const DEFAULT_MENUS: [(&str, &str, &str); 5] = [
    ("Users", "/users", "USR"),
    ("Roles", "/roles", "ROL"),
    ("Rules", "/rules", "RUL"),
    ("Levels", "/level", "LVL"),
    ("Subjects", "/subjects", "SUB"),
];

/// In-memory store for tests and demos.
///
/// All tables sit behind one mutex, so every call observes a single snapshot
/// and batch inserts are all-or-nothing, matching the Postgres store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    statuses: Vec<StatusRecord>,
    users: Vec<Stored<NewUser>>,
    groups: Vec<Stored<NewGroup>>,
    menus: Vec<MenuRecord>,
    menu_links: Vec<MenuLinkRecord>,
    user_links: Vec<UserLinkRecord>,
    levels: Vec<Stored<NewLevel>>,
    subjects: Vec<Stored<NewSubject>>,
    subject_levels: Vec<StoredSubjectLevel>,
}

#[derive(Debug, Clone)]
struct Stored<T> {
    id: i64,
    row: T,
}

#[derive(Debug, Clone)]
struct StoredSubjectLevel {
    id: i64,
    status_id: i64,
    record: SubjectLevelRecord,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn status_summary(&self, status_id: i64) -> StatusSummary {
        self.statuses
            .iter()
            .find(|status| status.id == status_id)
            .map(StatusSummary::from)
            .unwrap_or_else(|| StatusSummary {
                uuid: String::new(),
                code: String::new(),
                designation: String::new(),
            })
    }

    fn user_record(&self, user: &Stored<NewUser>) -> UserRecord {
        let row = &user.row;
        UserRecord {
            id: user.id,
            uuid: row.uuid.clone(),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            email: row.email.clone(),
            address: row.address.clone(),
            phone_number1: row.phone_number1.clone(),
            phone_number2: row.phone_number2.clone(),
            is_full_time: row.is_full_time,
            net_salary_per_month: row.net_salary_per_month,
            net_salary_per_hour: row.net_salary_per_hour,
            monthly_working_hour: row.monthly_working_hour,
            is_admin: row.is_admin,
            password_hash: row.password_hash.clone(),
            status: self.status_summary(row.status_id),
        }
    }

    fn user_by_id(&self, id: i64) -> Option<&Stored<NewUser>> {
        self.users.iter().find(|user| user.id == id)
    }

    fn group_record(&self, group: &Stored<NewGroup>) -> GroupRecord {
        GroupRecord {
            id: group.id,
            uuid: group.row.uuid.clone(),
            designation: group.row.designation.clone(),
            status: self.status_summary(group.row.status_id),
        }
    }

    fn group_kind(&self, group_id: i64) -> Option<GroupKind> {
        self.groups
            .iter()
            .find(|group| group.id == group_id)
            .map(|group| group.row.kind)
    }

    fn level_record(&self, level: &Stored<NewLevel>) -> LevelRecord {
        let teacher = level
            .row
            .teacher_in_charge_id
            .and_then(|id| self.user_by_id(id));
        LevelRecord {
            id: level.id,
            uuid: level.row.uuid.clone(),
            designation: level.row.designation.clone(),
            teacher_uuid: teacher.map(|t| t.row.uuid.clone()),
            teacher_first_name: teacher.map(|t| t.row.first_name.clone()),
            teacher_last_name: teacher.map(|t| t.row.last_name.clone()),
            status: self.status_summary(level.row.status_id),
        }
    }

    fn subject_record(&self, subject: &Stored<NewSubject>) -> SubjectRecord {
        SubjectRecord {
            id: subject.id,
            uuid: subject.row.uuid.clone(),
            designation: subject.row.designation.clone(),
            status: self.status_summary(subject.row.status_id),
        }
    }

    fn status_code_of(&self, status_id: i64) -> Option<&str> {
        self.statuses
            .iter()
            .find(|status| status.id == status_id)
            .map(|status| status.code.as_str())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn paginate<T>(rows: Vec<T>, query: &ListQuery) -> Page<T> {
    let total = rows.len() as i64;
    let offset = query.offset.unwrap_or(0).max(0) as usize;
    let limit = query.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
    let rows = rows.into_iter().skip(offset).take(limit).collect();
    Page { rows, total }
}

fn already_added() -> StoreError {
    StoreError::Conflict("Link already exists.".to_string())
}

impl MemoryStore {
    /// Store seeded with every status code and the default menus.
    pub fn new() -> Self {
        let store = Self::empty();
        {
            let mut tables = store.lock();
            for status in LifecycleStatus::ALL {
                let id = tables.next_id();
                tables.statuses.push(StatusRecord {
                    id,
                    uuid: generate_public_id(),
                    code: status.code().to_string(),
                    designation: status.designation().to_string(),
                });
            }
        }
        for (designation, path, code) in DEFAULT_MENUS {
            store.add_menu(designation, path, code);
        }
        store
    }

    /// Store with no seed data at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a menu and returns its public id.
    pub fn add_menu(&self, designation: &str, path: &str, code: &str) -> String {
        let mut tables = self.lock();
        let id = tables.next_id();
        let uuid = generate_public_id();
        tables.menus.push(MenuRecord {
            id,
            uuid: uuid.clone(),
            designation: designation.to_string(),
            path: path.to_string(),
            code: code.to_string(),
        });
        uuid
    }

    /// Public id of a menu by its code.
    pub fn menu_uuid(&self, code: &str) -> Option<String> {
        self.lock()
            .menus
            .iter()
            .find(|menu| menu.code == code)
            .map(|menu| menu.uuid.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.inner.lock().expect("poisoned lock")
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_status(&self, code: &str) -> StoreResult<Option<StatusRecord>> {
        let tables = self.lock();
        Ok(tables.statuses.iter().find(|s| s.code == code).cloned())
    }

    async fn set_status(&self, entity: SoftDeletable, id: i64, status_id: i64) -> StoreResult<()> {
        let mut tables = self.lock();
        match entity {
            SoftDeletable::User => {
                if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
                    user.row.status_id = status_id;
                }
            }
            SoftDeletable::Group => {
                if let Some(group) = tables.groups.iter_mut().find(|g| g.id == id) {
                    group.row.status_id = status_id;
                }
            }
            SoftDeletable::Level => {
                if let Some(level) = tables.levels.iter_mut().find(|l| l.id == id) {
                    level.row.status_id = status_id;
                }
            }
            SoftDeletable::Subject => {
                if let Some(subject) = tables.subjects.iter_mut().find(|s| s.id == id) {
                    subject.row.status_id = status_id;
                }
            }
        }
        Ok(())
    }

    async fn find_user(&self, uuid: &str) -> StoreResult<Option<UserRecord>> {
        let tables = self.lock();
        Ok(tables
            .users
            .iter()
            .find(|u| u.row.uuid == uuid)
            .map(|u| tables.user_record(u)))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let tables = self.lock();
        Ok(tables
            .users
            .iter()
            .find(|u| u.row.email == email)
            .map(|u| tables.user_record(u)))
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<()> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.row.email == user.email) {
            return Err(StoreError::Conflict(messages::EMAIL_FOUND.to_string()));
        }
        let id = tables.next_id();
        tables.users.push(Stored { id, row: user });
        Ok(())
    }

    async fn list_users(&self, query: &ListQuery) -> StoreResult<Page<UserRecord>> {
        let tables = self.lock();
        let keyword = query.keyword.as_str();
        let rows = tables
            .users
            .iter()
            .filter(|u| tables.status_code_of(u.row.status_id) == Some(query.status_code.as_str()))
            .filter(|u| {
                contains_ignore_case(&u.row.first_name, keyword)
                    || contains_ignore_case(&u.row.last_name, keyword)
                    || contains_ignore_case(&u.row.email, keyword)
                    || u.row.phone_number1.contains(keyword)
                    || u.row.phone_number2.as_deref().unwrap_or("").contains(keyword)
            })
            .map(|u| tables.user_record(u))
            .collect();
        Ok(paginate(rows, query))
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<()> {
        let mut tables = self.lock();
        if let Some(email) = &changes.email {
            if tables.users.iter().any(|u| u.id != id && &u.row.email == email) {
                return Err(StoreError::Conflict(messages::EMAIL_FOUND.to_string()));
            }
        }
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(());
        };
        let row = &mut user.row;
        if let Some(value) = changes.first_name {
            row.first_name = value;
        }
        if let Some(value) = changes.last_name {
            row.last_name = value;
        }
        if let Some(value) = changes.email {
            row.email = value;
        }
        if let Some(value) = changes.address {
            row.address = value;
        }
        if let Some(value) = changes.phone_number1 {
            row.phone_number1 = value;
        }
        if changes.phone_number2.is_some() {
            row.phone_number2 = changes.phone_number2;
        }
        if let Some(value) = changes.is_full_time {
            row.is_full_time = value;
        }
        if changes.net_salary_per_month.is_some() {
            row.net_salary_per_month = changes.net_salary_per_month;
        }
        if changes.net_salary_per_hour.is_some() {
            row.net_salary_per_hour = changes.net_salary_per_hour;
        }
        if changes.monthly_working_hour.is_some() {
            row.monthly_working_hour = changes.monthly_working_hour;
        }
        Ok(())
    }

    async fn find_group(&self, kind: GroupKind, uuid: &str) -> StoreResult<Option<GroupRecord>> {
        let tables = self.lock();
        Ok(tables
            .groups
            .iter()
            .find(|g| g.row.kind == kind && g.row.uuid == uuid)
            .map(|g| tables.group_record(g)))
    }

    async fn insert_group(&self, group: NewGroup) -> StoreResult<()> {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.groups.push(Stored { id, row: group });
        Ok(())
    }

    async fn list_groups(
        &self,
        kind: GroupKind,
        query: &ListQuery,
    ) -> StoreResult<Page<GroupRecord>> {
        let tables = self.lock();
        let rows = tables
            .groups
            .iter()
            .filter(|g| g.row.kind == kind)
            .filter(|g| tables.status_code_of(g.row.status_id) == Some(query.status_code.as_str()))
            .filter(|g| contains_ignore_case(&g.row.designation, &query.keyword))
            .map(|g| tables.group_record(g))
            .collect();
        Ok(paginate(rows, query))
    }

    async fn update_group(&self, id: i64, designation: Option<String>) -> StoreResult<()> {
        let mut tables = self.lock();
        if let (Some(group), Some(designation)) =
            (tables.groups.iter_mut().find(|g| g.id == id), designation)
        {
            group.row.designation = designation;
        }
        Ok(())
    }

    async fn find_menu(&self, uuid: &str) -> StoreResult<Option<MenuRecord>> {
        let tables = self.lock();
        Ok(tables.menus.iter().find(|m| m.uuid == uuid).cloned())
    }

    async fn find_menu_link(
        &self,
        kind: GroupKind,
        uuid: &str,
    ) -> StoreResult<Option<MenuLinkRecord>> {
        let tables = self.lock();
        Ok(tables
            .menu_links
            .iter()
            .find(|l| l.uuid == uuid && tables.group_kind(l.group_id) == Some(kind))
            .cloned())
    }

    async fn menu_link_exists(&self, menu_id: i64, group_id: i64) -> StoreResult<bool> {
        let tables = self.lock();
        Ok(tables
            .menu_links
            .iter()
            .any(|l| l.menu_id == menu_id && l.group_id == group_id))
    }

    async fn insert_menu_links(&self, links: Vec<NewMenuLink>) -> StoreResult<()> {
        let mut tables = self.lock();
        for (index, link) in links.iter().enumerate() {
            let stored = tables
                .menu_links
                .iter()
                .any(|l| l.menu_id == link.menu_id && l.group_id == link.group_id);
            let repeated = links[..index]
                .iter()
                .any(|l| l.menu_id == link.menu_id && l.group_id == link.group_id);
            if stored || repeated {
                return Err(already_added());
            }
        }
        for link in links {
            let id = tables.next_id();
            tables.menu_links.push(MenuLinkRecord {
                id,
                uuid: link.uuid,
                menu_id: link.menu_id,
                group_id: link.group_id,
                privilege: link.privilege.bits(),
            });
        }
        Ok(())
    }

    async fn update_menu_privileges(&self, updates: Vec<(i64, Privilege)>) -> StoreResult<()> {
        let mut tables = self.lock();
        for (id, privilege) in updates {
            if let Some(link) = tables.menu_links.iter_mut().find(|l| l.id == id) {
                link.privilege = privilege.bits();
            }
        }
        Ok(())
    }

    async fn list_menu_links(&self, group_id: i64) -> StoreResult<Vec<MenuLinkRow>> {
        let tables = self.lock();
        Ok(tables
            .menu_links
            .iter()
            .filter(|l| l.group_id == group_id)
            .filter_map(|l| {
                let menu = tables.menus.iter().find(|m| m.id == l.menu_id)?;
                Some(MenuLinkRow {
                    uuid: l.uuid.clone(),
                    privilege: l.privilege,
                    menu_uuid: menu.uuid.clone(),
                    menu_designation: menu.designation.clone(),
                    menu_path: menu.path.clone(),
                })
            })
            .collect())
    }

    async fn delete_menu_link(&self, id: i64) -> StoreResult<()> {
        self.lock().menu_links.retain(|l| l.id != id);
        Ok(())
    }

    async fn find_user_link(
        &self,
        kind: GroupKind,
        uuid: &str,
    ) -> StoreResult<Option<UserLinkRecord>> {
        let tables = self.lock();
        Ok(tables
            .user_links
            .iter()
            .find(|l| l.uuid == uuid && tables.group_kind(l.group_id) == Some(kind))
            .cloned())
    }

    async fn user_link_exists(&self, user_id: i64, group_id: i64) -> StoreResult<bool> {
        let tables = self.lock();
        Ok(tables
            .user_links
            .iter()
            .any(|l| l.user_id == user_id && l.group_id == group_id))
    }

    async fn insert_user_links(&self, links: Vec<NewUserLink>) -> StoreResult<()> {
        let mut tables = self.lock();
        for (index, link) in links.iter().enumerate() {
            let stored = tables
                .user_links
                .iter()
                .any(|l| l.user_id == link.user_id && l.group_id == link.group_id);
            let repeated = links[..index]
                .iter()
                .any(|l| l.user_id == link.user_id && l.group_id == link.group_id);
            if stored || repeated {
                return Err(already_added());
            }
        }
        for link in links {
            let id = tables.next_id();
            tables.user_links.push(UserLinkRecord {
                id,
                uuid: link.uuid,
                user_id: link.user_id,
                group_id: link.group_id,
            });
        }
        Ok(())
    }

    async fn list_user_links(&self, kind: GroupKind, user_id: i64) -> StoreResult<Vec<UserLinkRow>> {
        let tables = self.lock();
        Ok(tables
            .user_links
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| {
                let group = tables
                    .groups
                    .iter()
                    .find(|g| g.id == l.group_id && g.row.kind == kind)?;
                Some(UserLinkRow {
                    uuid: l.uuid.clone(),
                    group_uuid: group.row.uuid.clone(),
                    group_designation: group.row.designation.clone(),
                })
            })
            .collect())
    }

    async fn delete_user_link(&self, id: i64) -> StoreResult<()> {
        self.lock().user_links.retain(|l| l.id != id);
        Ok(())
    }

    async fn find_level(&self, uuid: &str) -> StoreResult<Option<LevelRecord>> {
        let tables = self.lock();
        Ok(tables
            .levels
            .iter()
            .find(|l| l.row.uuid == uuid)
            .map(|l| tables.level_record(l)))
    }

    async fn insert_level(&self, level: NewLevel) -> StoreResult<()> {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.levels.push(Stored { id, row: level });
        Ok(())
    }

    async fn list_levels(&self, query: &ListQuery) -> StoreResult<Page<LevelRecord>> {
        let tables = self.lock();
        let rows = tables
            .levels
            .iter()
            .filter(|l| tables.status_code_of(l.row.status_id) == Some(query.status_code.as_str()))
            .filter(|l| contains_ignore_case(&l.row.designation, &query.keyword))
            .map(|l| tables.level_record(l))
            .collect();
        Ok(paginate(rows, query))
    }

    async fn update_level(&self, id: i64, changes: LevelChanges) -> StoreResult<()> {
        let mut tables = self.lock();
        if let Some(level) = tables.levels.iter_mut().find(|l| l.id == id) {
            if let Some(designation) = changes.designation {
                level.row.designation = designation;
            }
            if changes.teacher_in_charge_id.is_some() {
                level.row.teacher_in_charge_id = changes.teacher_in_charge_id;
            }
        }
        Ok(())
    }

    async fn find_subject(&self, uuid: &str) -> StoreResult<Option<SubjectRecord>> {
        let tables = self.lock();
        Ok(tables
            .subjects
            .iter()
            .find(|s| s.row.uuid == uuid)
            .map(|s| tables.subject_record(s)))
    }

    async fn insert_subject(&self, subject: NewSubject) -> StoreResult<()> {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.subjects.push(Stored { id, row: subject });
        Ok(())
    }

    async fn list_subjects(&self, query: &ListQuery) -> StoreResult<Page<SubjectRecord>> {
        let tables = self.lock();
        let rows = tables
            .subjects
            .iter()
            .filter(|s| tables.status_code_of(s.row.status_id) == Some(query.status_code.as_str()))
            .filter(|s| contains_ignore_case(&s.row.designation, &query.keyword))
            .map(|s| tables.subject_record(s))
            .collect();
        Ok(paginate(rows, query))
    }

    async fn update_subject(&self, id: i64, designation: Option<String>) -> StoreResult<()> {
        let mut tables = self.lock();
        if let (Some(subject), Some(designation)) =
            (tables.subjects.iter_mut().find(|s| s.id == id), designation)
        {
            subject.row.designation = designation;
        }
        Ok(())
    }

    async fn find_subject_level(&self, uuid: &str) -> StoreResult<Option<SubjectLevelRecord>> {
        let tables = self.lock();
        Ok(tables
            .subject_levels
            .iter()
            .find(|l| l.record.uuid == uuid)
            .map(|l| l.record.clone()))
    }

    async fn subject_level_exists(&self, level_id: i64, subject_id: i64) -> StoreResult<bool> {
        let tables = self.lock();
        Ok(tables
            .subject_levels
            .iter()
            .any(|l| l.record.level_id == level_id && l.record.subject_id == subject_id))
    }

    async fn insert_subject_levels(&self, links: Vec<NewSubjectLevel>) -> StoreResult<()> {
        let mut tables = self.lock();
        for (index, link) in links.iter().enumerate() {
            let stored = tables.subject_levels.iter().any(|l| {
                l.record.level_id == link.level_id && l.record.subject_id == link.subject_id
            });
            let repeated = links[..index]
                .iter()
                .any(|l| l.level_id == link.level_id && l.subject_id == link.subject_id);
            if stored || repeated {
                return Err(already_added());
            }
        }
        for link in links {
            let id = tables.next_id();
            tables.subject_levels.push(StoredSubjectLevel {
                id,
                status_id: link.status_id,
                record: SubjectLevelRecord {
                    id,
                    uuid: link.uuid,
                    level_id: link.level_id,
                    subject_id: link.subject_id,
                    teacher_id: link.teacher_id,
                    coefficient: link.coefficient,
                },
            });
        }
        Ok(())
    }

    async fn list_subject_levels(
        &self,
        level_id: i64,
        status_code: &str,
    ) -> StoreResult<Vec<SubjectLevelRow>> {
        let tables = self.lock();
        Ok(tables
            .subject_levels
            .iter()
            .filter(|l| l.record.level_id == level_id)
            .filter(|l| tables.status_code_of(l.status_id) == Some(status_code))
            .filter_map(|l| {
                let subject = tables.subjects.iter().find(|s| s.id == l.record.subject_id)?;
                let teacher = l.record.teacher_id.and_then(|id| tables.user_by_id(id));
                Some(SubjectLevelRow {
                    uuid: l.record.uuid.clone(),
                    subject_uuid: subject.row.uuid.clone(),
                    subject_designation: subject.row.designation.clone(),
                    teacher_uuid: teacher.map(|t| t.row.uuid.clone()),
                    teacher_first_name: teacher.map(|t| t.row.first_name.clone()),
                    teacher_last_name: teacher.map(|t| t.row.last_name.clone()),
                    coefficient: l.record.coefficient,
                    status: tables.status_summary(l.status_id),
                })
            })
            .collect())
    }

    async fn update_subject_level(
        &self,
        id: i64,
        changes: SubjectLevelChanges,
    ) -> StoreResult<()> {
        let mut tables = self.lock();
        if let Some(link) = tables.subject_levels.iter_mut().find(|l| l.id == id) {
            if let Some(coefficient) = changes.coefficient {
                link.record.coefficient = coefficient;
            }
            if changes.teacher_id.is_some() {
                link.record.teacher_id = changes.teacher_id;
            }
        }
        Ok(())
    }

    async fn delete_subject_level(&self, id: i64) -> StoreResult<()> {
        self.lock().subject_levels.retain(|l| l.id != id);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
