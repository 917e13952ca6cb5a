mod handler;
pub mod model;
pub mod operation;

pub use handler::{login, logout, test_token};
