//! Bug tracking service backed by flat JSON files
//!
//! The heart of the crate is [`query`]: a pure filter, sort and page
//! pipeline over a slice of bugs. Around it sit JSON-file persistence
//! ([`db`]), login sessions ([`auth`]), a plain-text export ([`report`]),
//! TOML configuration ([`config`]) and an axum REST API ([`api`]).

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod query;
pub mod report;
pub mod version;

pub use db::models::{Bug, CreatorRef, User};
pub use query::{query, BugQuery, FilterSpec, PageSpec, QueryResult, SortDirection, SortField, SortSpec};
