use sqlx::FromRow;

use super::status::StatusSummary;

#[derive(Debug, Clone, FromRow)]
pub struct LevelRecord {
    pub id: i64,
    pub uuid: String,
    pub designation: String,
    pub teacher_uuid: Option<String>,
    pub teacher_first_name: Option<String>,
    pub teacher_last_name: Option<String>,
    #[sqlx(flatten)]
    pub status: StatusSummary,
}

#[derive(Debug, Clone)]
pub struct NewLevel {
    pub uuid: String,
    pub designation: String,
    pub teacher_in_charge_id: Option<i64>,
    pub status_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct LevelChanges {
    pub designation: Option<String>,
    pub teacher_in_charge_id: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SubjectLevelRecord {
    pub id: i64,
    pub uuid: String,
    pub level_id: i64,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub coefficient: f64,
}

#[derive(Debug, Clone)]
pub struct NewSubjectLevel {
    pub uuid: String,
    pub level_id: i64,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub coefficient: f64,
    pub status_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct SubjectLevelChanges {
    pub coefficient: Option<f64>,
    pub teacher_id: Option<i64>,
}

/// Subject-level link joined with its subject, teacher and status.
#[derive(Debug, Clone, FromRow)]
pub struct SubjectLevelRow {
    pub uuid: String,
    pub subject_uuid: String,
    pub subject_designation: String,
    pub teacher_uuid: Option<String>,
    pub teacher_first_name: Option<String>,
    pub teacher_last_name: Option<String>,
    pub coefficient: f64,
    #[sqlx(flatten)]
    pub status: StatusSummary,
}
