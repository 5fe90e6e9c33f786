// Version information for the bugtrack crate

/// Crate version, reported by the health endpoints
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
