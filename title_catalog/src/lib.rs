//! Catalog title ETL: CSV loading, normalization of delimited list columns into
//! entity + junction tables, and analytical queries, on SQLite via Diesel.
//!
//! Pipeline:
//! 1. [`db::migrate`] creates the schema.
//! 2. [`loader`] reads the CSV into the flat `titles` table.
//! 3. [`normalize`] derives `country` / `title_country` and `genre` / `title_genre`.
//! 4. [`analytics`] runs the read-only report queries.

#![deny(missing_docs)]

pub mod analytics;
pub mod config;
pub mod db;
pub mod loader;
pub mod models;
pub mod normalize;
/// Diesel table definitions matching the embedded migrations.
#[allow(missing_docs)]
pub mod schema;
pub mod title;
