use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{StatusSummary, UserChanges, UserLinkRow, UserRecord};
use crate::routes::require_text;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub phone_number1: String,
    pub phone_number2: Option<String>,
    pub is_full_time: bool,
    pub net_salary_per_month: Option<f64>,
    pub net_salary_per_hour: Option<f64>,
    pub monthly_working_hour: Option<f64>,
    /// Falls back to the configured default password.
    pub password: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> AppResult<()> {
        validate_email(&self.email)?;
        require_text("address", &self.address)?;
        require_text("phoneNumber1", &self.phone_number1)?;
        if let Some(password) = &self.password {
            require_text("password", password)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub is_full_time: Option<bool>,
    pub net_salary_per_month: Option<f64>,
    pub net_salary_per_hour: Option<f64>,
    pub monthly_working_hour: Option<f64>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(address) = &self.address {
            require_text("address", address)?;
        }
        if let Some(phone) = &self.phone_number1 {
            require_text("phoneNumber1", phone)?;
        }
        Ok(())
    }
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        UserChanges {
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
        }
    }
}

fn validate_email(email: &str) -> AppResult<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::Validation("email must be an email".into()));
    }
    Ok(())
}

/// User as returned to callers: no internal key, no credential hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub uuid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub phone_number1: String,
    pub phone_number2: Option<String>,
    pub is_full_time: bool,
    pub net_salary_per_month: Option<f64>,
    pub net_salary_per_hour: Option<f64>,
    pub monthly_working_hour: Option<f64>,
    pub is_admin: bool,
    pub status: StatusSummary,
}

impl From<UserRecord> for UserView {
    fn from(user: UserRecord) -> Self {
        Self {
            uuid: user.uuid,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            address: user.address,
            phone_number1: user.phone_number1,
            phone_number2: user.phone_number2,
            is_full_time: user.is_full_time,
            net_salary_per_month: user.net_salary_per_month,
            net_salary_per_hour: user.net_salary_per_hour,
            monthly_working_hour: user.monthly_working_hour,
            is_admin: user.is_admin,
            status: user.status,
        }
    }
}

/// One user ↔ role/rule assignment. The group id also answers to `roleId`/`ruleId`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserLinkRequest {
    pub user_id: String,
    #[serde(alias = "roleId", alias = "ruleId")]
    pub group_id: String,
}

#[derive(Debug, Serialize)]
pub struct GroupSummary {
    pub uuid: String,
    pub designation: String,
}

#[derive(Debug, Serialize)]
pub struct UserLinkView {
    pub uuid: String,
    pub group: GroupSummary,
}

impl From<UserLinkRow> for UserLinkView {
    fn from(row: UserLinkRow) -> Self {
        Self {
            uuid: row.uuid,
            group: GroupSummary {
                uuid: row.group_uuid,
                designation: row.group_designation,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn view_hides_internal_fields() {
        let view = UserView::from(UserRecord {
            id: 42,
            uuid: "u-1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@school.test".into(),
            address: "1 Main St".into(),
            phone_number1: "555".into(),
            phone_number2: None,
            is_full_time: true,
            net_salary_per_month: Some(1200.0),
            net_salary_per_hour: None,
            monthly_working_hour: None,
            is_admin: false,
            password_hash: "$2b$hash".into(),
            status: StatusSummary {
                uuid: "s-1".into(),
                code: "ACT".into(),
                designation: "Active".into(),
            },
        });
        let value = serde_json::to_value(view).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(value["uuid"], "u-1");
        assert_eq!(value["status"]["code"], "ACT");
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("passwordHash"));
        assert!(!object.contains_key("statusId"));
    }

    #[test]
    fn link_request_accepts_role_and_rule_names() {
        let role: CreateUserLinkRequest =
            serde_json::from_value(json!({"userId": "u", "roleId": "g"})).unwrap();
        let rule: CreateUserLinkRequest =
            serde_json::from_value(json!({"userId": "u", "ruleId": "g"})).unwrap();
        assert_eq!(role.group_id, "g");
        assert_eq!(rule.group_id, "g");
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("ab.com").is_err());
        assert!(validate_email("@b.com").is_err());
    }
}
