//! REST API layer
//!
//! axum router, handlers, DTOs and the JSON success/error envelopes.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::{create_router, AppState};
