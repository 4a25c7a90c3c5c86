//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`]:
//! - [`crate::schema::titles`]: the flat table, one row per catalog title
//! - [`crate::schema::country`] / [`crate::schema::genre`]: normalized entity tables
//! - [`crate::schema::title_country`] / [`crate::schema::title_genre`]: junction tables
//!
//! Entity ids are assigned by [`crate::normalize::registry::Registry`], so the
//! insertable entity forms carry an explicit `id`.

use diesel::prelude::*;

use crate::normalize::Entity;
use crate::schema::*;
use crate::title::{ContentType, TitleRecord};

/// A row in [`crate::schema::titles`].
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = titles, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(primary_key(show_id))]
pub struct Title {
    /// Unique identifier (primary key).
    pub show_id: String,
    /// `"Movie"` or `"TV Show"` (CHECK constrained).
    pub type_: String,
    /// Title text.
    pub title: String,
    /// Director name(s).
    pub director: Option<String>,
    /// Cast list.
    pub movie_cast: Option<String>,
    /// Country list.
    pub country: Option<String>,
    /// Free-text date added.
    pub date_added: Option<String>,
    /// Year of original release.
    pub release_year: i32,
    /// Content rating code.
    pub rating: Option<String>,
    /// Free-text duration.
    pub duration: Option<String>,
    /// Genre list.
    pub listed_in: Option<String>,
    /// Synopsis.
    pub description: Option<String>,
}

impl TryFrom<Title> for TitleRecord {
    type Error = crate::title::ParseContentTypeError;

    fn try_from(row: Title) -> Result<Self, Self::Error> {
        Ok(TitleRecord {
            content_type: row.type_.parse::<ContentType>()?,
            show_id: row.show_id,
            title: row.title,
            director: row.director,
            cast: row.movie_cast,
            country: row.country,
            date_added: row.date_added,
            release_year: row.release_year,
            rating: row.rating,
            duration: row.duration,
            listed_in: row.listed_in,
            description: row.description,
        })
    }
}

/// Insertable form of [`Title`], borrowed from a [`TitleRecord`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = titles)]
pub struct NewTitle<'a> {
    /// Unique identifier.
    pub show_id: &'a str,
    /// `"Movie"` or `"TV Show"`.
    pub type_: &'a str,
    /// Title text.
    pub title: &'a str,
    /// Director name(s).
    pub director: Option<&'a str>,
    /// Cast list.
    pub movie_cast: Option<&'a str>,
    /// Country list.
    pub country: Option<&'a str>,
    /// Free-text date added.
    pub date_added: Option<&'a str>,
    /// Year of original release.
    pub release_year: i32,
    /// Content rating code.
    pub rating: Option<&'a str>,
    /// Free-text duration.
    pub duration: Option<&'a str>,
    /// Genre list.
    pub listed_in: Option<&'a str>,
    /// Synopsis.
    pub description: Option<&'a str>,
}

impl<'a> From<&'a TitleRecord> for NewTitle<'a> {
    fn from(t: &'a TitleRecord) -> Self {
        NewTitle {
            show_id: &t.show_id,
            type_: t.content_type.as_db_str(),
            title: &t.title,
            director: t.director.as_deref(),
            movie_cast: t.cast.as_deref(),
            country: t.country.as_deref(),
            date_added: t.date_added.as_deref(),
            release_year: t.release_year,
            rating: t.rating.as_deref(),
            duration: t.duration.as_deref(),
            listed_in: t.listed_in.as_deref(),
            description: t.description.as_deref(),
        }
    }
}

// ----------------------- entity tables -----------------------

/// A row in [`crate::schema::country`].
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = country, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Country {
    /// Registry-assigned surrogate id.
    pub id: i32,
    /// Trimmed country name (unique).
    pub name: String,
    /// Number of titles referencing this country.
    pub title_count: i32,
}

impl From<Country> for Entity {
    fn from(row: Country) -> Self {
        Entity {
            id: row.id,
            name: row.name,
            title_count: row.title_count,
        }
    }
}

/// Insertable form of [`Country`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = country)]
pub struct NewCountry<'a> {
    /// Registry-assigned surrogate id.
    pub id: i32,
    /// Trimmed country name.
    pub name: &'a str,
    /// Number of titles referencing this country.
    pub title_count: i32,
}

/// A row in [`crate::schema::genre`].
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = genre, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Genre {
    /// Registry-assigned surrogate id.
    pub id: i32,
    /// Trimmed genre name (unique).
    pub name: String,
    /// Number of titles referencing this genre.
    pub title_count: i32,
}

impl From<Genre> for Entity {
    fn from(row: Genre) -> Self {
        Entity {
            id: row.id,
            name: row.name,
            title_count: row.title_count,
        }
    }
}

/// Insertable form of [`Genre`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = genre)]
pub struct NewGenre<'a> {
    /// Registry-assigned surrogate id.
    pub id: i32,
    /// Trimmed genre name.
    pub name: &'a str,
    /// Number of titles referencing this genre.
    pub title_count: i32,
}

// ----------------------- junction tables ---------------------
// Composite PK => declare both columns.

/// A row in [`crate::schema::title_country`].
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = title_country, check_for_backend(diesel::sqlite::Sqlite))]
pub struct TitleCountry {
    /// FK to [`Title::show_id`].
    pub show_id: String,
    /// FK to [`Country::id`].
    pub country_id: i32,
}

/// A row in [`crate::schema::title_genre`].
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = title_genre, check_for_backend(diesel::sqlite::Sqlite))]
pub struct TitleGenre {
    /// FK to [`Title::show_id`].
    pub show_id: String,
    /// FK to [`Genre::id`].
    pub genre_id: i32,
}
