use serde::{Deserialize, Serialize};

use crate::models::{GroupRecord, MenuLinkRow, Privilege, StatusSummary};

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub designation: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGroupRequest {
    pub designation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub uuid: String,
    pub designation: String,
    pub status: StatusSummary,
}

impl From<GroupRecord> for GroupView {
    fn from(group: GroupRecord) -> Self {
        Self {
            uuid: group.uuid,
            designation: group.designation,
            status: group.status,
        }
    }
}

/// Grants a group a privilege on a menu. The group id also answers to `roleId`/`ruleId`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuLinkRequest {
    #[serde(alias = "roleId", alias = "ruleId")]
    pub group_id: String,
    pub menu_id: String,
    pub privilege: Privilege,
}

/// Overwrites the privilege of an existing menu link.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrivilegeRequest {
    #[serde(alias = "menuRoleId", alias = "menuRuleId")]
    pub menu_link_id: String,
    pub privilege: Privilege,
}

#[derive(Debug, Serialize)]
pub struct MenuSummary {
    pub uuid: String,
    pub designation: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct MenuLinkView {
    pub uuid: String,
    pub privilege: Privilege,
    pub menu: MenuSummary,
}

impl From<MenuLinkRow> for MenuLinkView {
    fn from(row: MenuLinkRow) -> Self {
        Self {
            uuid: row.uuid,
            privilege: Privilege::from_bits_truncate(row.privilege),
            menu: MenuSummary {
                uuid: row.menu_uuid,
                designation: row.menu_designation,
                path: row.menu_path,
            },
        }
    }
}
