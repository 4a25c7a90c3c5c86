//! CSV loader for the flat `titles` table.
//!
//! ## What this does
//! - Reads CSV (optionally with a header row) into [`TitleRecord`]s with [`read_titles`].
//! - Malformed rows are **skipped, not fatal**: wrong column count, blank
//!   `show_id`, unknown content type, non-numeric `release_year`, or a CSV-level
//!   parse error. Each one is recorded in [`LoadReport::skipped`] and logged.
//! - Duplicate `show_id`s are a data-quality finding, reported in
//!   [`LoadReport::duplicate_ids`]; [`DuplicatePolicy`] decides whether the load
//!   keeps the first occurrence or is rejected.
//! - [`store`] writes the accepted rows in one immediate transaction.

pub mod store;

use std::{collections::BTreeMap, fmt, io, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::title::{ContentType, ParseContentTypeError, TitleRecord, non_blank};

/// Column order of the input CSV and of the `titles` table.
pub const COLUMNS: [&str; 12] = [
    "show_id",
    "type",
    "title",
    "director",
    "cast",
    "country",
    "date_added",
    "release_year",
    "rating",
    "duration",
    "listed_in",
    "description",
];

/// How to parse the CSV input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Skip the first row as a header.
    pub has_headers: bool,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: b',',
        }
    }
}

/// What to do when the input repeats a `show_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Persist the first occurrence, ignore later ones, and report them.
    #[default]
    KeepFirst,
    /// Fail the load before writing anything.
    Reject,
}

/// Why a single row was skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowError {
    /// Row does not have the expected number of cells.
    #[error("expected {expected} columns, found {found}")]
    ColumnCount {
        /// Expected cell count.
        expected: usize,
        /// Actual cell count.
        found: usize,
    },
    /// `show_id` cell is blank.
    #[error("show_id is blank")]
    MissingShowId,
    /// `type` cell is not a known content type.
    #[error(transparent)]
    ContentType(#[from] ParseContentTypeError),
    /// `release_year` cell is not an integer.
    #[error("release_year {0:?} is not an integer")]
    ReleaseYear(String),
    /// The CSV reader could not decode the record (bad UTF-8, unbalanced quotes).
    #[error("malformed CSV record: {0}")]
    Csv(String),
}

/// One skipped input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the input, when known.
    pub line: Option<u64>,
    /// Reason the row was skipped.
    pub reason: RowError,
}

/// Errors that abort a load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be opened.
    #[error("failed to open {}", path.display())]
    Open {
        /// Input path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The header row could not be read.
    #[error("failed to read CSV header")]
    Header(#[source] csv::Error),
    /// The underlying reader failed mid-input.
    #[error("failed to read CSV input")]
    Read(#[source] csv::Error),
    /// Duplicates found under [`DuplicatePolicy::Reject`].
    #[error("{count} duplicate show_id value(s) in input, e.g. {sample:?}")]
    DuplicateIds {
        /// Number of distinct identifiers that repeat.
        count: usize,
        /// One of them.
        sample: String,
    },
}

/// Summary of a load, including data-quality findings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read (header excluded).
    pub rows_read: usize,
    /// Rows that parsed into a [`TitleRecord`].
    pub accepted: usize,
    /// Rows written to `titles` (set by [`store`]).
    pub inserted: usize,
    /// Malformed rows, in input order.
    pub skipped: Vec<SkippedRow>,
    /// `show_id` -> occurrences, for identifiers seen more than once.
    pub duplicate_ids: BTreeMap<String, usize>,
}

impl LoadReport {
    /// True if the input had neither malformed rows nor duplicates.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.duplicate_ids.is_empty()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "rows read: {}  accepted: {}  inserted: {}  skipped: {}",
            self.rows_read,
            self.accepted,
            self.inserted,
            self.skipped.len()
        )?;
        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped rows")?;
            writeln!(f, "------------")?;
            for s in &self.skipped {
                match s.line {
                    Some(line) => writeln!(f, "- line {line}: {}", s.reason)?,
                    None => writeln!(f, "- {}", s.reason)?,
                }
            }
        }
        if !self.duplicate_ids.is_empty() {
            writeln!(f)?;
            writeln!(f, "Duplicate show_id")?;
            writeln!(f, "-----------------")?;
            for (id, n) in &self.duplicate_ids {
                writeln!(f, "- {id} x{n}")?;
            }
        }
        Ok(())
    }
}

/// Parsed titles plus the report describing what was dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// Accepted records in input order (duplicates included).
    pub titles: Vec<TitleRecord>,
    /// Findings.
    pub report: LoadReport,
}

/// Parse one CSV record in [`COLUMNS`] order.
pub fn parse_row(record: &csv::StringRecord) -> Result<TitleRecord, RowError> {
    if record.len() != COLUMNS.len() {
        return Err(RowError::ColumnCount {
            expected: COLUMNS.len(),
            found: record.len(),
        });
    }
    let cell = |i: usize| record.get(i).unwrap_or_default();

    let show_id = non_blank(cell(0)).ok_or(RowError::MissingShowId)?;
    let content_type: ContentType = cell(1).parse()?;
    let year_raw = cell(7).trim();
    let release_year: i32 = year_raw
        .parse()
        .map_err(|_| RowError::ReleaseYear(year_raw.to_string()))?;

    Ok(TitleRecord {
        show_id,
        content_type,
        title: cell(2).trim().to_string(),
        director: non_blank(cell(3)),
        cast: non_blank(cell(4)),
        country: non_blank(cell(5)),
        date_added: non_blank(cell(6)),
        release_year,
        rating: non_blank(cell(8)),
        duration: non_blank(cell(9)),
        listed_in: non_blank(cell(10)),
        description: non_blank(cell(11)),
    })
}

/// Read every title from `reader`, skipping malformed rows.
pub fn read_titles<R: io::Read>(reader: R, opts: &LoadOptions) -> Result<LoadOutcome, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(opts.has_headers)
        .delimiter(opts.delimiter)
        .flexible(true)
        .from_reader(reader);

    if opts.has_headers {
        let headers = rdr.headers().map_err(LoadError::Header)?;
        if headers.len() != COLUMNS.len() {
            warn!(
                found = headers.len(),
                expected = COLUMNS.len(),
                "header column count differs from expected layout"
            );
        }
    }

    let mut out = LoadOutcome::default();
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();

    for result in rdr.records() {
        out.report.rows_read += 1;
        let (line, parsed) = match result {
            Ok(record) => (
                record.position().map(|p| p.line()),
                parse_row(&record),
            ),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(LoadError::Read(e));
            }
            Err(e) => (
                e.position().map(|p| p.line()),
                Err(RowError::Csv(e.to_string())),
            ),
        };
        match parsed {
            Ok(title) => {
                *seen.entry(title.show_id.clone()).or_default() += 1;
                out.titles.push(title);
            }
            Err(reason) => {
                warn!(line, %reason, "skipping malformed row");
                out.report.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    out.report.accepted = out.titles.len();
    out.report.duplicate_ids = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    for (id, n) in &out.report.duplicate_ids {
        warn!(show_id = %id, occurrences = n, "duplicate show_id in input");
    }
    info!(
        rows = out.report.rows_read,
        accepted = out.report.accepted,
        skipped = out.report.skipped.len(),
        "csv parsed"
    );
    Ok(out)
}

/// Apply `policy` to a parsed load.
pub fn check_duplicates(report: &LoadReport, policy: DuplicatePolicy) -> Result<(), LoadError> {
    match (policy, report.duplicate_ids.keys().next()) {
        (DuplicatePolicy::Reject, Some(first)) => Err(LoadError::DuplicateIds {
            count: report.duplicate_ids.len(),
            sample: first.clone(),
        }),
        _ => Ok(()),
    }
}
