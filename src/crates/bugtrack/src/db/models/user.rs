//! User model for JSON file persistence

use serde::{Deserialize, Serialize};

use super::bug::CreatorRef;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier (UUID string)
    #[serde(rename = "_id")]
    pub id: String,

    /// Login name, unique ignoring case
    pub username: String,

    /// Display name
    pub fullname: String,

    /// Whether the user may edit any bug and manage users
    #[serde(default)]
    pub is_admin: bool,

    /// Creation time in epoch milliseconds
    pub created_at: i64,
}

impl User {
    pub fn new(username: impl Into<String>, fullname: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            fullname: fullname.into(),
            is_admin: false,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Reference stamped onto bugs this user files
    pub fn as_creator(&self) -> CreatorRef {
        CreatorRef {
            id: self.id.clone(),
            fullname: self.fullname.clone(),
        }
    }
}
