mod handler;
pub mod model;
pub mod operation;

pub use handler::{
    create, create_subject_links, delete_subject_link, find_all, find_one, list_subject_links,
    remove, update, update_subject_link,
};
