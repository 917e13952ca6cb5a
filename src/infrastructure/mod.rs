pub mod auth;

pub use auth::{Claims, TokenGuard, bearer_token, spawn_token_sweeper};
