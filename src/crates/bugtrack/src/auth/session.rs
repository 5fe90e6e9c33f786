//! Login sessions
//!
//! Opaque bearer tokens mapped to the user that logged in. Sessions live in
//! memory only; restarting the server logs everybody out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::db::models::{Bug, CreatorRef, User};

/// The user a request acts on behalf of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedInUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub fullname: String,
    pub is_admin: bool,
}

impl From<&User> for LoggedInUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            is_admin: user.is_admin,
        }
    }
}

impl LoggedInUser {
    /// Creators may edit their own bugs, admins may edit any
    pub fn can_modify(&self, bug: &Bug) -> bool {
        self.is_admin || bug.creator_id() == Some(self.id.as_str())
    }

    pub fn as_creator(&self) -> CreatorRef {
        CreatorRef {
            id: self.id.clone(),
            fullname: self.fullname.clone(),
        }
    }
}

#[derive(Debug)]
struct Session {
    user: LoggedInUser,
    /// `None` when the TTL is too large to represent
    expires_at: Option<Instant>,
}

impl Session {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |at| now >= at)
    }
}

/// Token to session map shared by every request handler
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Open a session for `user` and return its token
    pub fn create(&self, user: LoggedInUser) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let session = Session {
            expires_at: Instant::now().checked_add(self.ttl),
            user,
        };

        tracing::debug!("Opened session for {}", session.user.username);
        self.sessions.insert(token.clone(), session);
        token
    }

    /// Look up the user behind `token`. Expired sessions are dropped.
    pub fn resolve(&self, token: &str) -> Option<LoggedInUser> {
        let now = Instant::now();

        match self.sessions.get(token) {
            Some(session) if !session.is_expired(now) => return Some(session.user.clone()),
            Some(_) => {}
            None => return None,
        }

        self.sessions.remove_if(token, |_, session| session.is_expired(now));
        tracing::debug!("Rejected expired session");
        None
    }

    /// End a session; returns whether it existed
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// End every session of one user, returning how many were removed
    pub fn revoke_user(&self, user_id: &str) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.user.id != user_id);
        before.saturating_sub(self.sessions.len())
    }

    /// Drop all expired sessions, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, is_admin: bool) -> LoggedInUser {
        LoggedInUser {
            id: id.to_string(),
            username: format!("user-{id}"),
            fullname: format!("User {id}"),
            is_admin,
        }
    }

    #[test]
    fn test_create_and_resolve() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(user("u1", false));

        assert_eq!(store.resolve(&token), Some(user("u1", false)));
        assert_eq!(store.resolve("unknown"), None);
    }

    #[test]
    fn test_expired_session_is_rejected_and_removed() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create(user("u1", false));

        assert_eq!(store.resolve(&token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_revoke() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(user("u1", false));

        assert!(store.revoke(&token));
        assert!(!store.revoke(&token));
        assert_eq!(store.resolve(&token), None);
    }

    #[test]
    fn test_revoke_user() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.create(user("u1", false));
        store.create(user("u1", false));
        let other = store.create(user("u2", false));

        assert_eq!(store.revoke_user("u1"), 2);
        assert!(store.resolve(&other).is_some());
    }

    #[test]
    fn test_purge_expired() {
        let store = SessionStore::new(Duration::ZERO);
        store.create(user("u1", false));
        store.create(user("u2", false));

        assert_eq!(store.purge_expired(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_can_modify() {
        let creator = user("u1", false);
        let stranger = user("u2", false);
        let admin = user("u3", true);
        let bug = Bug::new("Mine", 2).with_creator(creator.as_creator());
        let orphan = Bug::new("Imported", 2);

        assert!(creator.can_modify(&bug));
        assert!(!stranger.can_modify(&bug));
        assert!(admin.can_modify(&bug));
        assert!(!creator.can_modify(&orphan));
        assert!(admin.can_modify(&orphan));
    }
}
