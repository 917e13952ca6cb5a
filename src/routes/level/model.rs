use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{LevelRecord, StatusSummary, SubjectLevelRow};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLevelRequest {
    pub designation: String,
    pub teacher_in_charge_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLevelRequest {
    pub designation: Option<String>,
    pub teacher_in_charge_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectLevelRequest {
    pub level_id: String,
    pub subject_id: String,
    pub teacher_id: Option<String>,
    pub coefficient: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectLevelRequest {
    pub teacher_id: Option<String>,
    pub coefficient: Option<f64>,
}

pub fn validate_coefficient(coefficient: f64) -> AppResult<()> {
    if !coefficient.is_finite() || coefficient < 0.0 {
        return Err(AppError::Validation(
            "coefficient must be a non-negative number".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSummary {
    pub uuid: String,
    pub first_name: String,
    pub last_name: String,
}

fn teacher(
    uuid: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Option<TeacherSummary> {
    Some(TeacherSummary {
        uuid: uuid?,
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelView {
    pub uuid: String,
    pub designation: String,
    pub teacher_in_charge: Option<TeacherSummary>,
    pub status: StatusSummary,
}

impl From<LevelRecord> for LevelView {
    fn from(level: LevelRecord) -> Self {
        Self {
            uuid: level.uuid,
            designation: level.designation,
            teacher_in_charge: teacher(
                level.teacher_uuid,
                level.teacher_first_name,
                level.teacher_last_name,
            ),
            status: level.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubjectSummary {
    pub uuid: String,
    pub designation: String,
}

#[derive(Debug, Serialize)]
pub struct SubjectLevelView {
    pub uuid: String,
    pub subject: SubjectSummary,
    pub teacher: Option<TeacherSummary>,
    pub coefficient: f64,
    pub status: StatusSummary,
}

impl From<SubjectLevelRow> for SubjectLevelView {
    fn from(row: SubjectLevelRow) -> Self {
        Self {
            uuid: row.uuid,
            subject: SubjectSummary {
                uuid: row.subject_uuid,
                designation: row.subject_designation,
            },
            teacher: teacher(row.teacher_uuid, row.teacher_first_name, row.teacher_last_name),
            coefficient: row.coefficient,
            status: row.status,
        }
    }
}
