//! Configuration module for bugtrack
//!
//! TOML server configuration: bind address, storage paths, listing limits
//! and session settings.

pub mod server;

pub use server::{
    QueryConfig, SecurityConfig, ServerConfig, ServerConfigError, ServerInfoConfig,
    StorageConfig, CONFIG_FILE_NAME,
};
