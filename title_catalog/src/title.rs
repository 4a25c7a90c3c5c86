//! Catalog title records and the typed views derived from their free-text fields.
//!
//! [`TitleRecord`] mirrors one row of the flat `titles` table. Optional text
//! columns are `None` when the source cell is absent or blank.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content type of a catalog title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    /// A single film.
    Movie,
    /// An episodic show (stored as `"TV Show"`).
    Series,
}

impl ContentType {
    /// Text stored in the `type` column.
    pub fn as_db_str(self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::Series => "TV Show",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Raised when a `type` cell is neither a movie nor a series.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown content type {0:?} (expected \"Movie\" or \"TV Show\")")]
pub struct ParseContentTypeError(pub String);

impl FromStr for ContentType {
    type Err = ParseContentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(ContentType::Movie),
            "tv show" | "series" => Ok(ContentType::Series),
            _ => Err(ParseContentTypeError(s.to_string())),
        }
    }
}

/// One catalog entry, as loaded from CSV and stored in `titles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    /// Unique identifier (`show_id`), e.g. `"s1"`.
    pub show_id: String,
    /// Movie or series.
    pub content_type: ContentType,
    /// Title text.
    pub title: String,
    /// Director name(s), comma-separated when several.
    pub director: Option<String>,
    /// Cast list, comma-separated.
    pub cast: Option<String>,
    /// Country list, comma-separated.
    pub country: Option<String>,
    /// Free-text date the title was added, e.g. `"September 25, 2021"`.
    pub date_added: Option<String>,
    /// Year of original release.
    pub release_year: i32,
    /// Content rating code, e.g. `"TV-MA"`.
    pub rating: Option<String>,
    /// Free-text duration, e.g. `"90 min"` or `"2 Seasons"`.
    pub duration: Option<String>,
    /// Genre list, comma-separated.
    pub listed_in: Option<String>,
    /// Synopsis.
    pub description: Option<String>,
}

impl TitleRecord {
    /// Parsed [`Runtime`] of the `duration` text, if it has a recognized shape.
    pub fn runtime(&self) -> Option<Runtime> {
        self.duration.as_deref().and_then(Runtime::parse)
    }

    /// Parsed `date_added`, if present and in `"Month D, YYYY"` form.
    pub fn added_on(&self) -> Option<NaiveDate> {
        self.date_added.as_deref().and_then(parse_date_added)
    }
}

/// Parsed form of the free-text `duration` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    /// Movie length, from `"<n> min"`.
    Minutes(u32),
    /// Series length, from `"<n> Season"` / `"<n> Seasons"`.
    Seasons(u32),
}

impl Runtime {
    /// Parse `"90 min"` / `"1 Season"` / `"3 Seasons"`; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let amount: u32 = parts.next()?.parse().ok()?;
        let unit = parts.next()?.to_ascii_lowercase();
        if parts.next().is_some() {
            return None;
        }
        match unit.as_str() {
            "min" | "mins" => Some(Runtime::Minutes(amount)),
            "season" | "seasons" => Some(Runtime::Seasons(amount)),
            _ => None,
        }
    }
}

/// Parse a `date_added` cell such as `"September 25, 2021"` or `" August 4, 2017"`.
pub fn parse_date_added(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%B %d, %Y").ok()
}

/// Trim a cell and map blank text to `None`.
pub(crate) fn non_blank(cell: &str) -> Option<String> {
    let t = cell.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parses_db_and_loose_spellings() {
        assert_eq!("Movie".parse::<ContentType>().unwrap(), ContentType::Movie);
        assert_eq!("TV Show".parse::<ContentType>().unwrap(), ContentType::Series);
        assert_eq!(" series ".parse::<ContentType>().unwrap(), ContentType::Series);
        assert!("Podcast".parse::<ContentType>().is_err());
        assert_eq!(ContentType::Series.to_string(), "TV Show");
    }

    #[test]
    fn runtime_shapes() {
        assert_eq!(Runtime::parse("90 min"), Some(Runtime::Minutes(90)));
        assert_eq!(Runtime::parse("1 Season"), Some(Runtime::Seasons(1)));
        assert_eq!(Runtime::parse(" 3 Seasons "), Some(Runtime::Seasons(3)));
        assert_eq!(Runtime::parse("TV-MA"), None);
        assert_eq!(Runtime::parse("90"), None);
        assert_eq!(Runtime::parse("90 min extra"), None);
    }

    #[test]
    fn date_added_parsing() {
        let d = parse_date_added(" September 25, 2021").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2021, 9, 25).unwrap());
        assert!(parse_date_added("2021-09-25").is_none());
        assert!(parse_date_added("").is_none());
    }

    #[test]
    fn record_views_parse_free_text() {
        let rec = TitleRecord {
            show_id: "s1".into(),
            content_type: ContentType::Movie,
            title: "A".into(),
            director: None,
            cast: None,
            country: None,
            date_added: Some("April 1, 2016".into()),
            release_year: 2016,
            rating: None,
            duration: Some("82 min".into()),
            listed_in: None,
            description: None,
        };
        assert_eq!(rec.runtime(), Some(Runtime::Minutes(82)));
        assert_eq!(rec.added_on(), NaiveDate::from_ymd_opt(2016, 4, 1));
    }

    #[test]
    fn non_blank_maps_whitespace_to_none() {
        assert_eq!(non_blank("  "), None);
        assert_eq!(non_blank(" x "), Some("x".to_string()));
    }
}
