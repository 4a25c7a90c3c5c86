//! Data-quality probes on the flat table.
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};

use super::{Tabular, percentage};

/// Columns checked by [`missing_values`]; `NULL` or blank counts as missing.
pub const CHECKED_COLUMNS: [&str; 9] = [
    "title",
    "director",
    "movie_cast",
    "country",
    "date_added",
    "rating",
    "duration",
    "listed_in",
    "description",
];

#[derive(QueryableByName)]
struct MissingRow {
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = BigInt)]
    missing: i64,
    #[diesel(sql_type = BigInt)]
    total: i64,
}

/// Missing-value count for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingValues {
    /// Column name.
    pub column: String,
    /// Rows where the column is `NULL` or blank.
    pub missing: i64,
    /// All rows.
    pub total: i64,
    /// `missing` as a percentage of `total`.
    pub percent: f64,
}

impl Tabular for MissingValues {
    fn headers() -> &'static [&'static str] {
        &["column", "missing", "total", "percent"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.column.clone(),
            self.missing.to_string(),
            self.total.to_string(),
            format!("{}%", self.percent),
        ]
    }
}

/// Count missing values per column of `titles`, in [`CHECKED_COLUMNS`] order.
pub fn missing_values(
    conn: &mut SqliteConnection,
    precision: u32,
) -> anyhow::Result<Vec<MissingValues>> {
    let q = CHECKED_COLUMNS
        .iter()
        .map(|c| {
            format!(
                "SELECT '{c}' AS column_name, \
                 COALESCE(SUM(CASE WHEN {c} IS NULL OR TRIM({c}) = '' THEN 1 ELSE 0 END), 0) AS missing, \
                 COUNT(*) AS total FROM titles"
            )
        })
        .collect::<Vec<_>>()
        .join(" UNION ALL ");

    let rows: Vec<MissingRow> = sql_query(q).load(conn)?;
    Ok(rows
        .into_iter()
        .map(|r| MissingValues {
            percent: percentage(r.missing, r.total, precision),
            column: r.column_name,
            missing: r.missing,
            total: r.total,
        })
        .collect())
}

/// One identifier that occurs on more than one row.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct DuplicateId {
    /// The repeated identifier.
    #[diesel(sql_type = Text)]
    pub show_id: String,
    /// Number of rows carrying it.
    #[diesel(sql_type = BigInt)]
    pub occurrences: i64,
}

impl Tabular for DuplicateId {
    fn headers() -> &'static [&'static str] {
        &["show_id", "occurrences"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.show_id.clone(), self.occurrences.to_string()]
    }
}

/// Identifiers present on more than one row of `titles`.
///
/// Diagnostic only: the persisted primary key keeps this empty, so duplicates in
/// the *input* surface through [`crate::loader::LoadReport::duplicate_ids`].
pub fn duplicate_show_ids(conn: &mut SqliteConnection) -> anyhow::Result<Vec<DuplicateId>> {
    let rows = sql_query(
        "SELECT show_id, COUNT(*) AS occurrences
         FROM titles
         GROUP BY show_id
         HAVING COUNT(*) > 1
         ORDER BY show_id",
    )
    .load(conn)?;
    Ok(rows)
}
