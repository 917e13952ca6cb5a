use serde::Serialize;
use sqlx::FromRow;

use crate::database::Store;
use crate::error::{AppError, AppResult};

/// Fixed lifecycle vocabulary. Every mutable entity references one of these
/// through a status row; deletion only ever flips that reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStatus {
    Active,
    Deleted,
    InProgress,
    Closed,
    Old,
    Suspended,
    Unpaid,
    Paid,
    Expelled,
}

impl LifecycleStatus {
    pub const ALL: [LifecycleStatus; 9] = [
        LifecycleStatus::Active,
        LifecycleStatus::Deleted,
        LifecycleStatus::InProgress,
        LifecycleStatus::Closed,
        LifecycleStatus::Old,
        LifecycleStatus::Suspended,
        LifecycleStatus::Unpaid,
        LifecycleStatus::Paid,
        LifecycleStatus::Expelled,
    ];

    pub fn code(self) -> &'static str {
        match self {
            LifecycleStatus::Active => "ACT",
            LifecycleStatus::Deleted => "SPR",
            LifecycleStatus::InProgress => "ENC",
            LifecycleStatus::Closed => "CLT",
            LifecycleStatus::Old => "ANC",
            LifecycleStatus::Suspended => "SPD",
            LifecycleStatus::Unpaid => "NOP",
            LifecycleStatus::Paid => "PAY",
            LifecycleStatus::Expelled => "EXP",
        }
    }

    pub fn designation(self) -> &'static str {
        match self {
            LifecycleStatus::Active => "Active",
            LifecycleStatus::Deleted => "Deleted",
            LifecycleStatus::InProgress => "In progress",
            LifecycleStatus::Closed => "Closed",
            LifecycleStatus::Old => "Old",
            LifecycleStatus::Suspended => "Suspended",
            LifecycleStatus::Unpaid => "Unpaid",
            LifecycleStatus::Paid => "Paid",
            LifecycleStatus::Expelled => "Expelled",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    /// Listing filter. Only the exact ACTIVE code selects active rows; anything
    /// else, including an absent filter, selects deleted rows.
    pub fn from_filter(raw: Option<&str>) -> Self {
        match raw {
            Some(code) if code == LifecycleStatus::Active.code() => LifecycleStatus::Active,
            _ => LifecycleStatus::Deleted,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct StatusRecord {
    pub id: i64,
    pub uuid: String,
    pub code: String,
    pub designation: String,
}

/// Status as embedded in every entity response.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StatusSummary {
    #[sqlx(rename = "status_uuid")]
    pub uuid: String,
    #[sqlx(rename = "status_code")]
    pub code: String,
    #[sqlx(rename = "status_designation")]
    pub designation: String,
}

impl StatusSummary {
    pub fn is(&self, status: LifecycleStatus) -> bool {
        self.code == status.code()
    }
}

impl From<&StatusRecord> for StatusSummary {
    fn from(record: &StatusRecord) -> Self {
        Self {
            uuid: record.uuid.clone(),
            code: record.code.clone(),
            designation: record.designation.clone(),
        }
    }
}

/// Looks up the status row for `status`. A missing row is a seed problem, not a caller error.
pub async fn resolve_status(store: &dyn Store, status: LifecycleStatus) -> AppResult<StatusRecord> {
    store
        .find_status(status.code())
        .await?
        .ok_or_else(|| AppError::StatusNotSeeded(status.code().to_string()))
}
