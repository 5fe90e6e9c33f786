//! Storage module
//!
//! Provides the JSON file collections, models, repositories, and error
//! handling for persistent storage of bugs and users.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;

pub use connection::{Database, JsonCollection};
pub use error::{DatabaseError, DbResult};
