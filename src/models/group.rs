use std::fmt;

use sqlx::FromRow;

use super::privilege::Privilege;
use super::status::StatusSummary;

/// The two names a permission group is exposed under. Both share one table
/// and one code path; the kind only partitions the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Role,
    Rule,
}

impl GroupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKind::Role => "role",
            GroupKind::Rule => "rule",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupKind::Role => "Role",
            GroupKind::Rule => "Rule",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct GroupRecord {
    pub id: i64,
    pub uuid: String,
    pub designation: String,
    #[sqlx(flatten)]
    pub status: StatusSummary,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub uuid: String,
    pub kind: GroupKind,
    pub designation: String,
    pub status_id: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct MenuRecord {
    pub id: i64,
    pub uuid: String,
    pub designation: String,
    pub path: String,
    pub code: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct MenuLinkRecord {
    pub id: i64,
    pub uuid: String,
    pub menu_id: i64,
    pub group_id: i64,
    pub privilege: i16,
}

#[derive(Debug, Clone)]
pub struct NewMenuLink {
    pub uuid: String,
    pub menu_id: i64,
    pub group_id: i64,
    pub privilege: Privilege,
}

/// Menu link joined with its menu, as listed under a group.
#[derive(Debug, Clone, FromRow)]
pub struct MenuLinkRow {
    pub uuid: String,
    pub privilege: i16,
    pub menu_uuid: String,
    pub menu_designation: String,
    pub menu_path: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserLinkRecord {
    pub id: i64,
    pub uuid: String,
    pub user_id: i64,
    pub group_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewUserLink {
    pub uuid: String,
    pub user_id: i64,
    pub group_id: i64,
}

/// User link joined with its group, as listed under a user.
#[derive(Debug, Clone, FromRow)]
pub struct UserLinkRow {
    pub uuid: String,
    pub group_uuid: String,
    pub group_designation: String,
}
