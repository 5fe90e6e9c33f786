//! User repository for storage operations

use crate::db::connection::Database;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::User;
use crate::query::TextMatcher;

/// Filter for listing users
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive pattern over username or fullname, matched
    /// literally when it is not a valid regex
    pub txt: Option<String>,
    /// Exact username (ignoring case)
    pub username: Option<String>,
}

impl UserFilter {
    fn matches(&self, text: Option<&TextMatcher>, user: &User) -> bool {
        if let Some(text) = text {
            if !text.is_match(&user.username) && !text.is_match(&user.fullname) {
                return false;
            }
        }
        if let Some(username) = &self.username {
            if !user.username.eq_ignore_ascii_case(username) {
                return false;
            }
        }
        true
    }
}

/// User repository for managing user storage operations
pub struct UserRepository;

impl UserRepository {
    /// Register a user; usernames are unique ignoring case
    pub async fn create(db: &Database, username: &str, fullname: &str) -> DbResult<User> {
        let user = User::new(username.trim(), fullname.trim());
        let stored = user.clone();

        db.users()
            .mutate(move |users| {
                if users
                    .iter()
                    .any(|u| u.username.eq_ignore_ascii_case(&stored.username))
                {
                    return Err(DatabaseError::constraint(format!(
                        "username already taken: {}",
                        stored.username
                    )));
                }
                users.insert(0, stored);
                Ok(())
            })
            .await?;

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_by_id(db: &Database, id: &str) -> DbResult<Option<User>> {
        Ok(db
            .users()
            .read(|users| users.iter().find(|u| u.id == id).cloned())
            .await)
    }

    /// Get a user by username, ignoring case
    pub async fn get_by_username(db: &Database, username: &str) -> DbResult<Option<User>> {
        let username = username.trim();
        Ok(db
            .users()
            .read(|users| {
                users
                    .iter()
                    .find(|u| u.username.eq_ignore_ascii_case(username))
                    .cloned()
            })
            .await)
    }

    /// List users matching `filter`, in storage order
    pub async fn list(db: &Database, filter: &UserFilter) -> Vec<User> {
        let text = TextMatcher::for_query(filter.txt.as_deref());
        db.users()
            .read(|users| {
                users
                    .iter()
                    .filter(|u| filter.matches(text.as_ref(), u))
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Delete a user, returning the removed record
    pub async fn delete(db: &Database, id: &str) -> DbResult<User> {
        db.users()
            .mutate(|users| {
                let idx = users
                    .iter()
                    .position(|u| u.id == id)
                    .ok_or_else(|| DatabaseError::not_found(format!("user {id}")))?;
                Ok(users.remove(idx))
            })
            .await
    }

    /// Grant or revoke admin rights
    pub async fn set_admin(db: &Database, username: &str, is_admin: bool) -> DbResult<User> {
        db.users()
            .mutate(|users| {
                let user = users
                    .iter_mut()
                    .find(|u| u.username.eq_ignore_ascii_case(username))
                    .ok_or_else(|| DatabaseError::not_found(format!("user {username}")))?;
                user.is_admin = is_admin;
                Ok(user.clone())
            })
            .await
    }

    pub async fn count(db: &Database) -> usize {
        db.users().len().await
    }
}
