// 缓存模块
// 令牌存储：登录签发的令牌在这里登记，登出或清理时移除

pub mod models;
pub mod operations;

use async_trait::async_trait;

pub use models::token::CachedToken;
pub use operations::memory::MemoryTokenStore;
pub use operations::token::RedisTokenStore;

pub type CacheResult<T> = Result<T, redis::RedisError>;

/// Revocable record of every issued bearer token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn save(&self, token: &str, entry: CachedToken) -> CacheResult<()>;
    async fn find(&self, token: &str) -> CacheResult<Option<CachedToken>>;
    async fn remove(&self, token: &str) -> CacheResult<()>;
    /// Drops every record, expired or not. Returns how many were removed.
    async fn purge_all(&self) -> CacheResult<u64>;
}
