use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Executor, FromRow, PgPool};

use super::{ListQuery, Page, SoftDeletable, Store, StoreError, StoreResult};
use crate::models::{
    GroupKind, GroupRecord, LevelChanges, LevelRecord, MenuLinkRecord, MenuLinkRow, MenuRecord,
    NewGroup, NewLevel, NewMenuLink, NewSubject, NewSubjectLevel, NewUser, NewUserLink, Privilege,
    StatusRecord, SubjectLevelChanges, SubjectLevelRecord, SubjectLevelRow, SubjectRecord,
    UserChanges, UserLinkRecord, UserLinkRow, UserRecord,
};
use crate::utils::messages;

const STATUS_COLUMNS: &str =
    "s.uuid AS status_uuid, s.code AS status_code, s.designation AS status_designation";

const USER_SELECT: &str = r#"
    SELECT u.id, u.uuid, u.first_name, u.last_name, u.email, u.address,
           u.phone_number1, u.phone_number2, u.is_full_time, u.net_salary_per_month,
           u.net_salary_per_hour, u.monthly_working_hour, u.is_admin, u.password_hash,
           s.uuid AS status_uuid, s.code AS status_code, s.designation AS status_designation
    FROM users u
    JOIN statuses s ON s.id = u.status_id
"#;

const GROUP_SELECT: &str = r#"
    SELECT g.id, g.uuid, g.designation,
           s.uuid AS status_uuid, s.code AS status_code, s.designation AS status_designation
    FROM permission_groups g
    JOIN statuses s ON s.id = g.status_id
"#;

const LEVEL_SELECT: &str = r#"
    SELECT l.id, l.uuid, l.designation,
           t.uuid AS teacher_uuid, t.first_name AS teacher_first_name,
           t.last_name AS teacher_last_name,
           s.uuid AS status_uuid, s.code AS status_code, s.designation AS status_designation
    FROM levels l
    JOIN statuses s ON s.id = l.status_id
    LEFT JOIN users t ON t.id = l.teacher_in_charge_id
"#;

const SUBJECT_SELECT: &str = r#"
    SELECT sub.id, sub.uuid, sub.designation,
           s.uuid AS status_uuid, s.code AS status_code, s.designation AS status_designation
    FROM subjects sub
    JOIN statuses s ON s.id = sub.status_id
"#;

/// Postgres-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects, tags the session and applies pending migrations.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET application_name = 'school_backend';")
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");

        Ok(Self::new(pool))
    }

    /// Runs the page query and the count query inside one repeatable-read
    /// transaction so both observe the same snapshot.
    ///
    /// `filter` is appended to `select` and may reference `$1` (status code),
    /// `$2` (keyword pattern) and, when `kind` is given, `$3`.
    async fn fetch_page<T>(
        &self,
        select: &str,
        filter: &str,
        query: &ListQuery,
        kind: Option<GroupKind>,
    ) -> StoreResult<Page<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let pattern = like_pattern(&query.keyword);
        let filter_params = if kind.is_some() { 3 } else { 2 };

        let page_sql = format!(
            "{select} {filter} ORDER BY 1 LIMIT ${} OFFSET ${}",
            filter_params + 1,
            filter_params + 2
        );
        let count_sql = format!(
            "SELECT COUNT(*) FROM ({select} {filter}) AS filtered",
        );

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let mut rows_query = sqlx::query_as::<_, T>(&page_sql)
            .bind(&query.status_code)
            .bind(&pattern);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&query.status_code)
            .bind(&pattern);
        if let Some(kind) = kind {
            rows_query = rows_query.bind(kind.as_str());
            count_query = count_query.bind(kind.as_str());
        }

        let rows = rows_query
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&mut *tx)
            .await?;
        let total = count_query.fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok(Page { rows, total })
    }
}

/// `%keyword%` with LIKE metacharacters escaped.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Unique violations become [`StoreError::Conflict`]; everything else is passed through.
fn map_write_err(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            let message = match db.constraint() {
                Some("users_email_key") => messages::EMAIL_FOUND.to_string(),
                Some(constraint) => format!("Link already exists ({constraint})."),
                None => "Record already exists.".to_string(),
            };
            return StoreError::Conflict(message);
        }
    }
    StoreError::Database(error)
}

#[async_trait]
impl Store for PgStore {
    async fn find_status(&self, code: &str) -> StoreResult<Option<StatusRecord>> {
        let status = sqlx::query_as::<_, StatusRecord>(
            "SELECT id, uuid, code, designation FROM statuses WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    async fn set_status(&self, entity: SoftDeletable, id: i64, status_id: i64) -> StoreResult<()> {
        // `table()` comes from a fixed allowlist, never from input.
        let sql = format!("UPDATE {} SET status_id = $1 WHERE id = $2", entity.table());
        sqlx::query(&sql)
            .bind(status_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_user(&self, uuid: &str) -> StoreResult<Option<UserRecord>> {
        let sql = format!("{USER_SELECT} WHERE u.uuid = $1");
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let sql = format!("{USER_SELECT} WHERE u.email = $1");
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                uuid, first_name, last_name, email, address, phone_number1, phone_number2,
                is_full_time, net_salary_per_month, net_salary_per_hour, monthly_working_hour,
                is_admin, password_hash, status_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(&user.uuid)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.address)
        .bind(&user.phone_number1)
        .bind(&user.phone_number2)
        .bind(user.is_full_time)
        .bind(user.net_salary_per_month)
        .bind(user.net_salary_per_hour)
        .bind(user.monthly_working_hour)
        .bind(user.is_admin)
        .bind(&user.password_hash)
        .bind(user.status_id)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;

        Ok(())
    }

    async fn list_users(&self, query: &ListQuery) -> StoreResult<Page<UserRecord>> {
        self.fetch_page(
            USER_SELECT,
            r#"WHERE s.code = $1 AND (
                u.first_name ILIKE $2 OR u.last_name ILIKE $2 OR u.email ILIKE $2
                OR u.phone_number1 LIKE $2 OR COALESCE(u.phone_number2, '') LIKE $2
            )"#,
            query,
            None,
        )
        .await
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                address = COALESCE($5, address),
                phone_number1 = COALESCE($6, phone_number1),
                phone_number2 = COALESCE($7, phone_number2),
                is_full_time = COALESCE($8, is_full_time),
                net_salary_per_month = COALESCE($9, net_salary_per_month),
                net_salary_per_hour = COALESCE($10, net_salary_per_hour),
                monthly_working_hour = COALESCE($11, monthly_working_hour)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.address)
        .bind(changes.phone_number1)
        .bind(changes.phone_number2)
        .bind(changes.is_full_time)
        .bind(changes.net_salary_per_month)
        .bind(changes.net_salary_per_hour)
        .bind(changes.monthly_working_hour)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;

        Ok(())
    }

    async fn find_group(&self, kind: GroupKind, uuid: &str) -> StoreResult<Option<GroupRecord>> {
        let sql = format!("{GROUP_SELECT} WHERE g.uuid = $1 AND g.kind = $2");
        let group = sqlx::query_as::<_, GroupRecord>(&sql)
            .bind(uuid)
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    async fn insert_group(&self, group: NewGroup) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO permission_groups (uuid, kind, designation, status_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(&group.uuid)
        .bind(group.kind.as_str())
        .bind(&group.designation)
        .bind(group.status_id)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;

        Ok(())
    }

    async fn list_groups(
        &self,
        kind: GroupKind,
        query: &ListQuery,
    ) -> StoreResult<Page<GroupRecord>> {
        self.fetch_page(
            GROUP_SELECT,
            "WHERE s.code = $1 AND g.designation ILIKE $2 AND g.kind = $3",
            query,
            Some(kind),
        )
        .await
    }

    async fn update_group(&self, id: i64, designation: Option<String>) -> StoreResult<()> {
        sqlx::query(
            "UPDATE permission_groups SET designation = COALESCE($2, designation) WHERE id = $1",
        )
        .bind(id)
        .bind(designation)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_menu(&self, uuid: &str) -> StoreResult<Option<MenuRecord>> {
        let menu = sqlx::query_as::<_, MenuRecord>(
            "SELECT id, uuid, designation, path, code FROM menus WHERE uuid = $1",
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(menu)
    }

    async fn find_menu_link(
        &self,
        kind: GroupKind,
        uuid: &str,
    ) -> StoreResult<Option<MenuLinkRecord>> {
        let link = sqlx::query_as::<_, MenuLinkRecord>(
            r#"
            SELECT mp.id, mp.uuid, mp.menu_id, mp.group_id, mp.privilege
            FROM menu_privileges mp
            JOIN permission_groups g ON g.id = mp.group_id
            WHERE mp.uuid = $1 AND g.kind = $2
            "#,
        )
        .bind(uuid)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    async fn menu_link_exists(&self, menu_id: i64, group_id: i64) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM menu_privileges WHERE menu_id = $1 AND group_id = $2)",
        )
        .bind(menu_id)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_menu_links(&self, links: Vec<NewMenuLink>) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for link in &links {
            sqlx::query(
                "INSERT INTO menu_privileges (uuid, menu_id, group_id, privilege) VALUES ($1, $2, $3, $4)",
            )
            .bind(&link.uuid)
            .bind(link.menu_id)
            .bind(link.group_id)
            .bind(link.privilege.bits())
            .execute(&mut *tx)
            .await
            .map_err(map_write_err)?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn update_menu_privileges(&self, updates: Vec<(i64, Privilege)>) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for (id, privilege) in &updates {
            sqlx::query("UPDATE menu_privileges SET privilege = $2 WHERE id = $1")
                .bind(id)
                .bind(privilege.bits())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn list_menu_links(&self, group_id: i64) -> StoreResult<Vec<MenuLinkRow>> {
        let rows = sqlx::query_as::<_, MenuLinkRow>(
            r#"
            SELECT mp.uuid, mp.privilege,
                   m.uuid AS menu_uuid, m.designation AS menu_designation, m.path AS menu_path
            FROM menu_privileges mp
            JOIN menus m ON m.id = mp.menu_id
            WHERE mp.group_id = $1
            ORDER BY mp.id
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete_menu_link(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM menu_privileges WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_user_link(
        &self,
        kind: GroupKind,
        uuid: &str,
    ) -> StoreResult<Option<UserLinkRecord>> {
        let link = sqlx::query_as::<_, UserLinkRecord>(
            r#"
            SELECT ug.id, ug.uuid, ug.user_id, ug.group_id
            FROM user_groups ug
            JOIN permission_groups g ON g.id = ug.group_id
            WHERE ug.uuid = $1 AND g.kind = $2
            "#,
        )
        .bind(uuid)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    async fn user_link_exists(&self, user_id: i64, group_id: i64) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_groups WHERE user_id = $1 AND group_id = $2)",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_user_links(&self, links: Vec<NewUserLink>) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for link in &links {
            sqlx::query("INSERT INTO user_groups (uuid, user_id, group_id) VALUES ($1, $2, $3)")
                .bind(&link.uuid)
                .bind(link.user_id)
                .bind(link.group_id)
                .execute(&mut *tx)
                .await
                .map_err(map_write_err)?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn list_user_links(&self, kind: GroupKind, user_id: i64) -> StoreResult<Vec<UserLinkRow>> {
        let rows = sqlx::query_as::<_, UserLinkRow>(
            r#"
            SELECT ug.uuid, g.uuid AS group_uuid, g.designation AS group_designation
            FROM user_groups ug
            JOIN permission_groups g ON g.id = ug.group_id
            WHERE ug.user_id = $1 AND g.kind = $2
            ORDER BY ug.id
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete_user_link(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM user_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_level(&self, uuid: &str) -> StoreResult<Option<LevelRecord>> {
        let sql = format!("{LEVEL_SELECT} WHERE l.uuid = $1");
        let level = sqlx::query_as::<_, LevelRecord>(&sql)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;

        Ok(level)
    }

    async fn insert_level(&self, level: NewLevel) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO levels (uuid, designation, teacher_in_charge_id, status_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(&level.uuid)
        .bind(&level.designation)
        .bind(level.teacher_in_charge_id)
        .bind(level.status_id)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;

        Ok(())
    }

    async fn list_levels(&self, query: &ListQuery) -> StoreResult<Page<LevelRecord>> {
        self.fetch_page(
            LEVEL_SELECT,
            "WHERE s.code = $1 AND l.designation ILIKE $2",
            query,
            None,
        )
        .await
    }

    async fn update_level(&self, id: i64, changes: LevelChanges) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE levels SET
                designation = COALESCE($2, designation),
                teacher_in_charge_id = COALESCE($3, teacher_in_charge_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.designation)
        .bind(changes.teacher_in_charge_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_subject(&self, uuid: &str) -> StoreResult<Option<SubjectRecord>> {
        let sql = format!("{SUBJECT_SELECT} WHERE sub.uuid = $1");
        let subject = sqlx::query_as::<_, SubjectRecord>(&sql)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;

        Ok(subject)
    }

    async fn insert_subject(&self, subject: NewSubject) -> StoreResult<()> {
        sqlx::query("INSERT INTO subjects (uuid, designation, status_id) VALUES ($1, $2, $3)")
            .bind(&subject.uuid)
            .bind(&subject.designation)
            .bind(subject.status_id)
            .execute(&self.pool)
            .await
            .map_err(map_write_err)?;

        Ok(())
    }

    async fn list_subjects(&self, query: &ListQuery) -> StoreResult<Page<SubjectRecord>> {
        self.fetch_page(
            SUBJECT_SELECT,
            "WHERE s.code = $1 AND sub.designation ILIKE $2",
            query,
            None,
        )
        .await
    }

    async fn update_subject(&self, id: i64, designation: Option<String>) -> StoreResult<()> {
        sqlx::query("UPDATE subjects SET designation = COALESCE($2, designation) WHERE id = $1")
            .bind(id)
            .bind(designation)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_subject_level(&self, uuid: &str) -> StoreResult<Option<SubjectLevelRecord>> {
        let link = sqlx::query_as::<_, SubjectLevelRecord>(
            r#"
            SELECT id, uuid, level_id, subject_id, teacher_id, coefficient
            FROM subject_levels
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    async fn subject_level_exists(&self, level_id: i64, subject_id: i64) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM subject_levels WHERE level_id = $1 AND subject_id = $2)",
        )
        .bind(level_id)
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_subject_levels(&self, links: Vec<NewSubjectLevel>) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for link in &links {
            sqlx::query(
                r#"
                INSERT INTO subject_levels (uuid, level_id, subject_id, teacher_id, coefficient, status_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&link.uuid)
            .bind(link.level_id)
            .bind(link.subject_id)
            .bind(link.teacher_id)
            .bind(link.coefficient)
            .bind(link.status_id)
            .execute(&mut *tx)
            .await
            .map_err(map_write_err)?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn list_subject_levels(
        &self,
        level_id: i64,
        status_code: &str,
    ) -> StoreResult<Vec<SubjectLevelRow>> {
        let sql = format!(
            r#"
            SELECT sl.uuid, sub.uuid AS subject_uuid, sub.designation AS subject_designation,
                   t.uuid AS teacher_uuid, t.first_name AS teacher_first_name,
                   t.last_name AS teacher_last_name, sl.coefficient, {STATUS_COLUMNS}
            FROM subject_levels sl
            JOIN subjects sub ON sub.id = sl.subject_id
            JOIN statuses s ON s.id = sl.status_id
            LEFT JOIN users t ON t.id = sl.teacher_id
            WHERE sl.level_id = $1 AND s.code = $2
            ORDER BY sl.id
            "#
        );
        let rows = sqlx::query_as::<_, SubjectLevelRow>(&sql)
            .bind(level_id)
            .bind(status_code)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn update_subject_level(
        &self,
        id: i64,
        changes: SubjectLevelChanges,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE subject_levels SET
                coefficient = COALESCE($2, coefficient),
                teacher_id = COALESCE($3, teacher_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.coefficient)
        .bind(changes.teacher_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_subject_level(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM subject_levels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
