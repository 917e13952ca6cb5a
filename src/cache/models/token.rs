use serde::{Deserialize, Serialize};

/// 令牌缓存数据模型
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedToken {
    pub user_id: String,
    pub expires_at: i64, // Unix timestamp
}

impl CachedToken {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}
