//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - SQLite connection helpers: [`connection::connect_sqlite`] applies WAL, foreign_keys=ON, and a 5000ms busy_timeout.
//! - Embedded Diesel migrations and runners: [`migrate::run_sqlite`] and [`migrate::run_all`],
//!   which accepts `sqlite:` / `sqlite://` prefixed URLs as well as bare file paths.
//!
//! Example:
//! ```no_run
//! use title_catalog::db::{migrate, connection};
//!
//! let db_path = std::env::temp_dir().join("title_catalog_example.db");
//! migrate::run_all(db_path.to_str().unwrap()).expect("migrations");
//!
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;

/// Resolve a `DATABASE_URL` into the path form Diesel's SQLite backend expects.
///
/// `sqlite://` and `sqlite:` prefixes are stripped; PostgreSQL URLs are rejected
/// since the schema relies on SQLite-specific behavior (`rowid` ordering).
pub fn sqlite_path(database_url: &str) -> anyhow::Result<&str> {
    let url = database_url.trim();
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        anyhow::bail!("Unsupported DATABASE_URL (only SQLite is supported): {url}");
    }
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    if path.is_empty() {
        anyhow::bail!("DATABASE_URL is empty");
    }
    Ok(path)
}
