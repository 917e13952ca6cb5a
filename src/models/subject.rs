use sqlx::FromRow;

use super::status::StatusSummary;

#[derive(Debug, Clone, FromRow)]
pub struct SubjectRecord {
    pub id: i64,
    pub uuid: String,
    pub designation: String,
    #[sqlx(flatten)]
    pub status: StatusSummary,
}

#[derive(Debug, Clone)]
pub struct NewSubject {
    pub uuid: String,
    pub designation: String,
    pub status_id: i64,
}
