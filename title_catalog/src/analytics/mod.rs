//! Read-only analytical queries over `titles` and the normalized relations.
//!
//! Query groups:
//! - [`quality`]: missing values per column, duplicate identifiers
//! - [`stats`]: content-type split, release-year and runtime summaries,
//!   release-year and date-added breakdowns
//! - [`relations`]: most referenced countries / genres and self-joins
//!   (shared directors across movies and series, repeated titles)
//! - [`share`]: per-entity share of a rating with a minimum-titles threshold
//!
//! All SQL is issued through `diesel::sql_query` with bound parameters; table
//! names interpolated into SQL come only from [`crate::normalize::DelimitedField`].
//! Result rows implement [`Tabular`] so the CLI can print them with [`render`].

pub mod quality;
pub mod relations;
pub mod share;
pub mod stats;

/// Largest supported rounding precision; [`round_to`] clamps to it.
pub const MAX_PRECISION: u32 = 10;

/// `part * 100 / whole`, rounded to `precision` decimals; `0.0` when `whole` is 0.
///
/// ```
/// use title_catalog::analytics::percentage;
///
/// assert_eq!(percentage(3, 12, 2), 25.0);
/// assert_eq!(percentage(1, 3, 1), 33.3);
/// assert_eq!(percentage(5, 0, 2), 0.0);
/// ```
pub fn percentage(part: i64, whole: i64, precision: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 * 100.0 / whole as f64, precision)
}

/// Round `value` to `precision` decimal places (half away from zero).
///
/// `precision` above [`MAX_PRECISION`] is treated as [`MAX_PRECISION`].
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    (value * factor).round() / factor
}

/// A row type that can be printed as part of a text table.
pub trait Tabular {
    /// Column headers.
    fn headers() -> &'static [&'static str];
    /// Cell values, same length as [`Tabular::headers`].
    fn cells(&self) -> Vec<String>;
}

/// Render rows as an aligned text table (headers, underline, one line per row).
///
/// An empty slice renders as `(no rows)`.
pub fn render<T: Tabular>(rows: &[T]) -> String {
    render_table(
        T::headers(),
        &rows.iter().map(T::cells).collect::<Vec<_>>(),
    )
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    let mut line = padded.join("  ").trim_end().to_string();
    line.push('\n');
    line
}

/// Render `rows` under `headers`, padding every column to its widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&pad_line(headers.iter().copied(), &widths));
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&pad_line(dashes.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
    }
    out
}
