use std::sync::Arc;

use config::Config;
use database::Store;
use infrastructure::TokenGuard;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod models;
pub mod result;
pub mod router;
pub mod routes;
pub mod utils;

pub use router::build_router;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub guard: TokenGuard,
    pub config: Config,
}
