//! Descriptive statistics and temporal breakdowns.
use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Double, Integer, Nullable, Text};

use super::{Tabular, percentage, round_to};
use crate::schema::titles;
use crate::title::{ContentType, Runtime, parse_date_added};

// ----------------------- content type -----------------------

#[derive(QueryableByName)]
struct TypeCountRow {
    #[diesel(sql_type = Text)]
    content_type: String,
    #[diesel(sql_type = BigInt)]
    titles: i64,
}

/// Titles per content type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeShare {
    /// `"Movie"` or `"TV Show"`.
    pub content_type: String,
    /// Titles of this type.
    pub titles: i64,
    /// Share of all titles, in percent.
    pub percent: f64,
}

impl Tabular for TypeShare {
    fn headers() -> &'static [&'static str] {
        &["type", "titles", "percent"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.content_type.clone(),
            self.titles.to_string(),
            format!("{}%", self.percent),
        ]
    }
}

/// Count and share of each content type, largest first.
pub fn type_breakdown(
    conn: &mut SqliteConnection,
    precision: u32,
) -> anyhow::Result<Vec<TypeShare>> {
    let rows: Vec<TypeCountRow> = sql_query(
        "SELECT type AS content_type, COUNT(*) AS titles
         FROM titles
         GROUP BY type
         ORDER BY titles DESC, type",
    )
    .load(conn)?;

    let total: i64 = rows.iter().map(|r| r.titles).sum();
    Ok(rows
        .into_iter()
        .map(|r| TypeShare {
            percent: percentage(r.titles, total, precision),
            content_type: r.content_type,
            titles: r.titles,
        })
        .collect())
}

// ----------------------- release year -----------------------

#[derive(QueryableByName)]
struct YearSummaryRow {
    #[diesel(sql_type = BigInt)]
    titles: i64,
    #[diesel(sql_type = Nullable<Integer>)]
    earliest: Option<i32>,
    #[diesel(sql_type = Nullable<Integer>)]
    latest: Option<i32>,
    #[diesel(sql_type = Nullable<Double>)]
    mean: Option<f64>,
}

/// Release-year range and mean over all titles.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseYearSummary {
    /// Titles counted.
    pub titles: i64,
    /// Oldest release year.
    pub earliest: i32,
    /// Newest release year.
    pub latest: i32,
    /// Mean release year, one decimal.
    pub mean: f64,
}

impl Tabular for ReleaseYearSummary {
    fn headers() -> &'static [&'static str] {
        &["titles", "earliest", "latest", "mean"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.titles.to_string(),
            self.earliest.to_string(),
            self.latest.to_string(),
            format!("{:.1}", self.mean),
        ]
    }
}

/// Min / max / mean release year; `None` for an empty table.
pub fn release_year_summary(
    conn: &mut SqliteConnection,
) -> anyhow::Result<Option<ReleaseYearSummary>> {
    let row: YearSummaryRow = sql_query(
        "SELECT COUNT(*) AS titles,
                MIN(release_year) AS earliest,
                MAX(release_year) AS latest,
                AVG(release_year) AS mean
         FROM titles",
    )
    .get_result(conn)?;

    Ok(match (row.earliest, row.latest, row.mean) {
        (Some(earliest), Some(latest), Some(mean)) => Some(ReleaseYearSummary {
            titles: row.titles,
            earliest,
            latest,
            mean: round_to(mean, 1),
        }),
        _ => None,
    })
}

/// Titles per release year, split by content type.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct YearCount {
    /// Release year.
    #[diesel(sql_type = Integer)]
    pub release_year: i32,
    /// Movies released that year.
    #[diesel(sql_type = BigInt)]
    pub movies: i64,
    /// Series released that year.
    #[diesel(sql_type = BigInt)]
    pub series: i64,
    /// All titles released that year.
    #[diesel(sql_type = BigInt)]
    pub total: i64,
}

impl Tabular for YearCount {
    fn headers() -> &'static [&'static str] {
        &["release_year", "movies", "series", "total"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.release_year.to_string(),
            self.movies.to_string(),
            self.series.to_string(),
            self.total.to_string(),
        ]
    }
}

/// The `limit` most recent release years with per-type counts, newest first.
pub fn titles_by_release_year(
    conn: &mut SqliteConnection,
    limit: i64,
) -> anyhow::Result<Vec<YearCount>> {
    let rows = sql_query(
        "SELECT release_year,
                SUM(CASE WHEN type = 'Movie' THEN 1 ELSE 0 END) AS movies,
                SUM(CASE WHEN type = 'TV Show' THEN 1 ELSE 0 END) AS series,
                COUNT(*) AS total
         FROM titles
         GROUP BY release_year
         ORDER BY release_year DESC
         LIMIT ?",
    )
    .bind::<BigInt, _>(limit)
    .load(conn)?;
    Ok(rows)
}

// ----------------------- date added -----------------------

/// Titles per calendar year of `date_added`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddedByYear {
    /// `(year, titles)` in ascending year order.
    pub by_year: Vec<(i32, i64)>,
    /// Non-blank values that did not parse as a date.
    pub unparsed: i64,
    /// Rows without a `date_added`.
    pub missing: i64,
}

/// Group titles by the year they were added, parsing the free-text dates.
pub fn titles_added_by_year(conn: &mut SqliteConnection) -> anyhow::Result<AddedByYear> {
    use chrono::Datelike;

    let dates: Vec<Option<String>> = titles::table.select(titles::date_added).load(conn)?;

    let mut years: BTreeMap<i32, i64> = BTreeMap::new();
    let mut out = AddedByYear::default();
    for d in dates {
        match d.as_deref().map(str::trim) {
            None | Some("") => out.missing += 1,
            Some(raw) => match parse_date_added(raw) {
                Some(date) => *years.entry(date.year()).or_default() += 1,
                None => out.unparsed += 1,
            },
        }
    }
    out.by_year = years.into_iter().collect();
    Ok(out)
}

// ----------------------- runtime -----------------------

/// Length statistics for one content type.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeStats {
    /// Movie (minutes) or series (seasons).
    pub content_type: ContentType,
    /// Titles whose duration parsed.
    pub titles: i64,
    /// Shortest.
    pub min: u32,
    /// Longest.
    pub max: u32,
    /// Mean, one decimal.
    pub mean: f64,
    /// Titles of this type whose duration was missing or unparseable.
    pub unparsed: i64,
}

impl RuntimeStats {
    /// Unit of `min` / `max` / `mean`.
    pub fn unit(&self) -> &'static str {
        match self.content_type {
            ContentType::Movie => "min",
            ContentType::Series => "seasons",
        }
    }
}

impl Tabular for RuntimeStats {
    fn headers() -> &'static [&'static str] {
        &["type", "unit", "titles", "min", "max", "mean", "unparsed"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.content_type.to_string(),
            self.unit().to_string(),
            self.titles.to_string(),
            self.min.to_string(),
            self.max.to_string(),
            format!("{:.1}", self.mean),
            self.unparsed.to_string(),
        ]
    }
}

#[derive(Default)]
struct Acc {
    n: i64,
    min: u32,
    max: u32,
    sum: u64,
    unparsed: i64,
}

impl Acc {
    fn add(&mut self, v: u32) {
        if self.n == 0 {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        self.n += 1;
        self.sum += u64::from(v);
    }
}

/// Movie minutes and series seasons, parsed from `duration`.
///
/// A movie whose duration is given in seasons (or vice versa) counts as unparsed.
/// Types with no parsed durations are omitted.
pub fn runtime_summary(conn: &mut SqliteConnection) -> anyhow::Result<Vec<RuntimeStats>> {
    let rows: Vec<(String, Option<String>)> = titles::table
        .select((titles::type_, titles::duration))
        .load(conn)?;

    let mut movies = Acc::default();
    let mut series = Acc::default();
    for (kind, duration) in rows {
        let Ok(kind) = kind.parse::<ContentType>() else {
            continue;
        };
        let runtime = duration.as_deref().and_then(Runtime::parse);
        match (kind, runtime) {
            (ContentType::Movie, Some(Runtime::Minutes(m))) => movies.add(m),
            (ContentType::Series, Some(Runtime::Seasons(s))) => series.add(s),
            (ContentType::Movie, _) => movies.unparsed += 1,
            (ContentType::Series, _) => series.unparsed += 1,
        }
    }

    Ok([(ContentType::Movie, movies), (ContentType::Series, series)]
        .into_iter()
        .filter(|(_, acc)| acc.n > 0)
        .map(|(content_type, acc)| RuntimeStats {
            content_type,
            titles: acc.n,
            min: acc.min,
            max: acc.max,
            mean: round_to(acc.sum as f64 / acc.n as f64, 1),
            unparsed: acc.unparsed,
        })
        .collect())
}
