// 路由模块
// 每个实体一个子模块：handler 解析请求，operation 实现业务，model 定义请求/响应结构

pub mod auth;
pub mod group;
pub mod level;
pub mod subject;
pub mod user;

mod extract;

pub use extract::{AppJson, AppQuery};

use serde::Deserialize;

use crate::database::{ListQuery, Store};
use crate::error::{AppError, AppResult};
use crate::models::{LifecycleStatus, resolve_status};
use crate::utils::calculate_offset;

/// `?limit&page&value&status` shared by every listing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub value: Option<String>,
    pub status: Option<String>,
}

impl ListParams {
    /// Window is applied only when `limit` is given; `page` then defaults to 1.
    pub async fn to_query(&self, store: &dyn Store) -> AppResult<ListQuery> {
        if let Some(limit) = self.limit {
            if limit < 1 {
                return Err(AppError::Validation("limit must be a positive number.".into()));
            }
        }
        if let Some(page) = self.page {
            if page < 1 {
                return Err(AppError::Validation("page must be a positive number.".into()));
            }
        }

        let status = resolve_status(store, LifecycleStatus::from_filter(self.status.as_deref())).await?;
        let offset = match self.limit {
            Some(limit) => Some(
                calculate_offset(limit, self.page.unwrap_or(1))
                    .ok_or_else(|| AppError::Validation("page is out of range.".into()))?,
            ),
            None => None,
        };

        Ok(ListQuery {
            keyword: self.value.clone().unwrap_or_default(),
            status_code: status.code,
            limit: self.limit,
            offset,
        })
    }
}

/// Status filter for link listings that are not paginated.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

/// Link-creation bodies accept a single object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> AppResult<Vec<T>> {
        let items = match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        };
        if items.is_empty() {
            return Err(AppError::Validation("At least one item is required.".into()));
        }
        Ok(items)
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} should not be empty")));
    }
    Ok(())
}

pub(crate) fn not_found(label: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{label} ID {id} not found in database."))
}
