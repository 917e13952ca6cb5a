mod auth;
mod error_handler;

pub use auth::{require_admin, require_auth};
pub use error_handler::log_errors;
