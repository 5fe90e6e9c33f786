//! User API models and DTOs

use serde::{Deserialize, Serialize};

use crate::db::repositories::UserFilter;

/// Query parameters for listing users
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListQuery {
    /// Substring of username or full name
    pub txt: Option<String>,

    /// Exact username
    pub username: Option<String>,
}

impl From<UserListQuery> for UserFilter {
    fn from(query: UserListQuery) -> Self {
        UserFilter {
            txt: query.txt,
            username: query.username.filter(|u| !u.trim().is_empty()),
        }
    }
}
