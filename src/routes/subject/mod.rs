mod handler;
pub mod model;
pub mod operation;

pub use handler::{create, find_all, find_one, remove, update};
