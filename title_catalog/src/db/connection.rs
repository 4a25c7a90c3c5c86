//! Opening catalog databases.
//!
//! Every connection gets the same session settings, see [`CONNECTION_PRAGMAS`].
//! `journal_mode` persists in the file; the other two must be set per connection.
//!
//! ```no_run
//! use title_catalog::db::connection::connect_sqlite;
//!
//! let mut conn = connect_sqlite("sqlite:titles.db").expect("open catalog");
//! # let _ = &mut conn;
//! ```

use anyhow::Context;
use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};
use tracing::debug;

use super::sqlite_path;

/// Session PRAGMAs applied by [`connect_sqlite`], in order.
pub const CONNECTION_PRAGMAS: [&str; 3] = [
    "PRAGMA journal_mode=WAL;",
    // junction rows cascade from titles and entities
    "PRAGMA foreign_keys=ON;",
    "PRAGMA busy_timeout=5000;",
];

/// Open the catalog at `database_url` (path or `sqlite:` URL) with [`CONNECTION_PRAGMAS`] applied.
pub fn connect_sqlite(database_url: &str) -> anyhow::Result<SqliteConnection> {
    let path = sqlite_path(database_url)?;
    let mut conn = SqliteConnection::establish(path)
        .with_context(|| format!("open sqlite database {path}"))?;

    for pragma in CONNECTION_PRAGMAS {
        sql_query(pragma)
            .execute(&mut conn)
            .with_context(|| format!("apply {pragma}"))?;
    }
    debug!(path, "catalog connection ready");
    Ok(conn)
}
