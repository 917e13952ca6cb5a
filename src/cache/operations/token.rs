use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use sha2::{Digest, Sha256};

use crate::cache::{CacheResult, TokenStore, models::token::CachedToken};

const KEY_PREFIX: &str = "token:";
const PURGE_BATCH: usize = 500;

/// 令牌缓存操作
///
/// Keys hold a SHA-256 of the bearer string, never the token itself.
#[derive(Clone)]
pub struct RedisTokenStore {
    redis: Arc<RedisClient>,
}

impl RedisTokenStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

pub(crate) fn token_key(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("{KEY_PREFIX}{hex}")
}

fn codec_error(context: &'static str, e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::IoError, context, e.to_string()))
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn save(&self, token: &str, entry: CachedToken) -> CacheResult<()> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let json = serde_json::to_string(&entry).map_err(|e| codec_error("serialize token", e))?;

        // 过期时间与token一致
        let ttl = entry.expires_at - chrono::Utc::now().timestamp();
        if ttl > 0 {
            let _: () = conn.set_ex(token_key(token), json, ttl as u64).await?;
        }

        Ok(())
    }

    async fn find(&self, token: &str) -> CacheResult<Option<CachedToken>> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(token_key(token)).await?;

        match result {
            Some(json) => {
                let entry =
                    serde_json::from_str(&json).map_err(|e| codec_error("deserialize token", e))?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, token: &str) -> CacheResult<()> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let _: () = conn.del(token_key(token)).await?;

        Ok(())
    }

    async fn purge_all(&self) -> CacheResult<u64> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        // SCAN 不会阻塞 redis，先收集再分批删除
        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = conn
                .scan_match::<_, String>(format!("{KEY_PREFIX}*"))
                .await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        let mut removed = 0;
        for chunk in keys.chunks(PURGE_BATCH) {
            let count: u64 = conn.del(chunk).await?;
            removed += count;
        }
        Ok(removed)
    }
}
