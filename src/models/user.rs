use sqlx::FromRow;

use super::status::StatusSummary;

#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
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
    pub password_hash: String,
    #[sqlx(flatten)]
    pub status: StatusSummary,
}

#[derive(Debug, Clone)]
pub struct NewUser {
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
    pub password_hash: String,
    pub status_id: i64,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
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
