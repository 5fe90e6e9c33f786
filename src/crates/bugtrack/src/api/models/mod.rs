//! API data transfer objects (DTOs) and response models

pub mod auth;
pub mod bug;
pub mod user;

pub use auth::{LoginRequest, SessionResponse, SignupRequest};
pub use bug::{BugListQuery, CreateBugRequest, UpdateBugRequest};
pub use user::UserListQuery;

/// System health response
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,

    /// Storage status
    pub storage: String,

    /// Configured server name
    pub server: String,

    /// API version
    pub version: String,

    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(
        status: impl Into<String>,
        storage: impl Into<String>,
        server: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            storage: storage.into(),
            server: server.into(),
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
