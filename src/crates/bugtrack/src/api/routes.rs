//! API route definitions

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{handlers, middleware};
use crate::auth::SessionStore;
use crate::config::{QueryConfig, ServerConfig};
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub query: QueryConfig,
    pub server_name: Arc<str>,
    /// Username that becomes admin on signup
    pub bootstrap_admin: Option<Arc<str>>,
}

impl AppState {
    pub fn new(db: Database, config: &ServerConfig) -> Self {
        Self {
            db,
            sessions: SessionStore::new(Duration::from_secs(config.security.session_ttl_secs)),
            query: config.query,
            server_name: Arc::from(config.server.name.as_str()),
            bootstrap_admin: config.security.bootstrap_admin.as_deref().map(Arc::from),
        }
    }

    pub fn is_bootstrap_admin(&self, username: &str) -> bool {
        self.bootstrap_admin
            .as_deref()
            .map_or(false, |admin| admin.eq_ignore_ascii_case(username))
    }
}

/// Build the complete API router, with request logging and CORS applied
pub fn create_router(app_state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(handlers::health))
        .route("/api/v1/system/health", get(handlers::health_detailed))
        // Bug endpoints
        .route(
            "/api/v1/bugs",
            post(handlers::create_bug).get(handlers::list_bugs),
        )
        .route("/api/v1/bugs/stats", get(handlers::get_bug_stats))
        .route("/api/v1/bugs/export", get(handlers::export_bugs))
        .route(
            "/api/v1/bugs/:id",
            get(handlers::get_bug)
                .put(handlers::update_bug)
                .delete(handlers::delete_bug),
        )
        // Session endpoints
        .route("/api/v1/auth/signup", post(handlers::signup))
        .route("/api/v1/auth/login", post(handlers::login))
        .route("/api/v1/auth/logout", post(handlers::logout))
        .route("/api/v1/auth/me", get(handlers::me))
        // User endpoints
        .route("/api/v1/users", get(handlers::list_users))
        .route(
            "/api/v1/users/:id",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        .layer(middleware::logging_layer())
        .layer(middleware::cors_layer(allowed_origins))
        .with_state(app_state)
}
