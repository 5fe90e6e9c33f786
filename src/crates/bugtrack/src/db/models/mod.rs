//! Persistent models
//!
//! Records stored in the JSON collection files. Field names follow the
//! on-disk layout (`_id`, camelCase), timestamps are epoch milliseconds.

pub mod bug;
pub mod user;

pub use bug::{Bug, CreatorRef, MAX_SEVERITY, MIN_SEVERITY};
pub use user::User;
