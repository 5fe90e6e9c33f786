//! bugtrack server binary
//!
//! Loads configuration, opens the JSON collections and serves the REST API
//! until CTRL-C or SIGTERM.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use bugtrack::api::{create_router, AppState};
use bugtrack::auth::SessionStore;
use bugtrack::config::ServerConfig;
use bugtrack::db::{repositories::UserRepository, Database};

/// How often expired sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Parser)]
#[command(name = "bugtrack-server", version, about = "Bug tracking REST server")]
struct Args {
    /// Path to bugtrack-server.toml
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Override the configured bind host
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Override the configured bind port
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing/logging
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())
        .context("failed to load server configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Server name: {}", config.server.name);
    tracing::info!("Bugs file: {}", config.storage.bugs_path.display());
    tracing::info!("Users file: {}", config.storage.users_path.display());

    let db = Database::open(&config.storage)
        .await
        .context("failed to open storage")?;
    db.health_check().await.context("storage health check failed")?;

    if let Some(username) = &config.security.bootstrap_admin {
        match UserRepository::set_admin(&db, username, true).await {
            Ok(user) => tracing::info!("Granted admin rights to {}", user.username),
            Err(e) if e.is_not_found() => {
                tracing::warn!("Bootstrap admin {} does not exist yet", username)
            }
            Err(e) => return Err(e).context("failed to grant bootstrap admin"),
        }
    }

    let app_state = AppState::new(db, &config);
    tokio::spawn(sweep_sessions(app_state.sessions.clone()));

    tracing::info!("Building API router");
    let app = create_router(app_state, &config.security.allowed_origins);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Starting bugtrack server on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("bugtrack server shut down gracefully");
    Ok(())
}

async fn sweep_sessions(sessions: SessionStore) {
    let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        let purged = sessions.purge_expired();
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }
    }
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
