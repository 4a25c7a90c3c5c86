//! Writes parsed titles into the flat table.
use std::{fs::File, io, path::Path};

use anyhow::Context;
use diesel::prelude::*;
use tracing::{debug, info};

use super::{DuplicatePolicy, LoadError, LoadOptions, LoadReport, check_duplicates, read_titles};
use crate::models::NewTitle;
use crate::schema::titles;
use crate::title::TitleRecord;

/// Insert `rows` into `titles` in one immediate transaction, in input order.
///
/// Uses `INSERT OR IGNORE`, so the first row for a `show_id` wins and later
/// ones (or rows already present from an earlier load) are ignored. Returns the
/// number of rows actually inserted.
pub fn insert_titles(conn: &mut SqliteConnection, rows: &[TitleRecord]) -> anyhow::Result<usize> {
    let inserted = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let mut inserted = 0;
        for t in rows {
            let n = diesel::insert_or_ignore_into(titles::table)
                .values(NewTitle::from(t))
                .execute(conn)?;
            if n == 0 {
                debug!(show_id = %t.show_id, "show_id already present; row ignored");
            }
            inserted += n;
        }
        Ok(inserted)
    })?;
    Ok(inserted)
}

/// Parse CSV from `reader`, apply `policy`, and write the accepted rows.
pub fn load_titles<R: io::Read>(
    conn: &mut SqliteConnection,
    reader: R,
    opts: &LoadOptions,
    policy: DuplicatePolicy,
) -> anyhow::Result<LoadReport> {
    let outcome = read_titles(reader, opts)?;
    check_duplicates(&outcome.report, policy)?;

    let mut report = outcome.report;
    report.inserted = insert_titles(conn, &outcome.titles)?;
    info!(
        inserted = report.inserted,
        ignored = report.accepted - report.inserted,
        "titles loaded"
    );
    Ok(report)
}

/// Open the CSV file at `path` and [`load_titles`] from it.
pub fn load_csv_path(
    conn: &mut SqliteConnection,
    path: impl AsRef<Path>,
    opts: &LoadOptions,
    policy: DuplicatePolicy,
) -> anyhow::Result<LoadReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_titles(conn, io::BufReader::new(file), opts, policy)
        .with_context(|| format!("load titles from {}", path.display()))
}

/// Read the flat table back in load order.
pub fn read_all_titles(conn: &mut SqliteConnection) -> anyhow::Result<Vec<TitleRecord>> {
    use crate::models::Title;
    use diesel::dsl::sql;
    use diesel::sql_types::Integer;

    let rows = titles::table
        .select(Title::as_select())
        .order(sql::<Integer>("rowid"))
        .load::<Title>(conn)?;
    rows.into_iter()
        .map(|row| TitleRecord::try_from(row).map_err(anyhow::Error::from))
        .collect()
}
