mod handler;
pub mod model;
pub mod operation;

pub use handler::{
    create, create_role_links, create_rule_links, delete_role_link, delete_rule_link, find_all,
    find_one, list_roles, list_rules, remove, update,
};
