mod handler;
pub mod model;
pub mod operation;

pub use handler::{
    create, create_menu_links, delete_menu_link, find_all, find_one, list_menu_links, remove,
    update, update_privileges,
};
