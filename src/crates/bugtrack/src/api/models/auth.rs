//! Signup and login DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::validation::{validate_not_empty, validate_string_length, validate_username};
use crate::auth::LoggedInUser;

/// Request to register a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub fullname: String,
}

impl SignupRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_username(&self.username)?;
        validate_not_empty(&self.fullname, "fullname")?;
        validate_string_length(self.fullname.trim(), "fullname", 1, 128)
    }
}

/// Request to log in as an existing user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// A fresh session token and who it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: LoggedInUser,
}
