//! Repository pattern implementations for storage access
//!
//! Stateless repository structs whose associated functions take the
//! [`Database`](crate::db::Database) handle they operate on.

pub mod bug_repo;
pub mod user_repo;

pub use bug_repo::{BugChanges, BugRepository, BugStats, NewBug};
pub use user_repo::{UserFilter, UserRepository};
