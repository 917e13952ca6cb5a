use serde::{Deserialize, Serialize};

use crate::models::{StatusSummary, SubjectRecord};

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub designation: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubjectRequest {
    pub designation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubjectView {
    pub uuid: String,
    pub designation: String,
    pub status: StatusSummary,
}

impl From<SubjectRecord> for SubjectView {
    fn from(subject: SubjectRecord) -> Self {
        Self {
            uuid: subject.uuid,
            designation: subject.designation,
            status: subject.status,
        }
    }
}
