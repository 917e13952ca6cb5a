use axum::http::StatusCode;
use serde::Serialize;

use crate::utils::messages;

/// Bare acknowledgement returned by every mutation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub status_code: u16,
    pub message: String,
}

impl ExecuteResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK, messages::OK)
    }
}

/// One page of a filtered listing. `total_rows` counts the whole filter, not the page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginate<T: Serialize> {
    pub status_code: u16,
    pub data: Vec<T>,
    pub total_rows: i64,
    pub page: Option<i64>,
}

impl<T: Serialize> Paginate<T> {
    pub fn new(data: Vec<T>, total_rows: i64, page: Option<i64>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            data,
            total_rows,
            page,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            data,
        }
    }
}
