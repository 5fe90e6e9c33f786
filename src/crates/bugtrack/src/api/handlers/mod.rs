//! API request handlers, one module per resource

pub mod auth;
pub mod bugs;
pub mod health;
pub mod users;

pub use auth::{login, logout, me, signup};
pub use bugs::{create_bug, delete_bug, export_bugs, get_bug, get_bug_stats, list_bugs, update_bug};
pub use health::{health, health_detailed};
pub use users::{delete_user, get_user, list_users};
