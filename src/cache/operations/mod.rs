/// 缓存操作
pub mod memory;
pub mod token;

pub use memory::MemoryTokenStore;
pub use token::RedisTokenStore;
