//! Entity rankings and self-join relationship discovery.
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Text};

use super::Tabular;
use crate::models::{Country, Genre};
use crate::normalize::{DelimitedField, Entity};
use crate::schema::{country, genre};

impl Tabular for Entity {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "titles"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.title_count.to_string(),
        ]
    }
}

/// The `limit` most referenced entities of `field` (ties broken by name).
///
/// Reads the entity table, so run the normalizer first.
pub fn top_entities(
    conn: &mut SqliteConnection,
    field: DelimitedField,
    limit: i64,
) -> anyhow::Result<Vec<Entity>> {
    let top: Vec<Entity> = match field {
        DelimitedField::Country => country::table
            .select(Country::as_select())
            .order((country::title_count.desc(), country::name))
            .limit(limit)
            .load::<Country>(conn)?
            .into_iter()
            .map(Entity::from)
            .collect(),
        DelimitedField::Genre => genre::table
            .select(Genre::as_select())
            .order((genre::title_count.desc(), genre::name))
            .limit(limit)
            .load::<Genre>(conn)?
            .into_iter()
            .map(Entity::from)
            .collect(),
    };
    Ok(top)
}

/// A movie and a series by the same director.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct SharedDirector {
    /// Director text, as stored.
    #[diesel(sql_type = Text)]
    pub director: String,
    /// Movie identifier.
    #[diesel(sql_type = Text)]
    pub movie_id: String,
    /// Movie title.
    #[diesel(sql_type = Text)]
    pub movie_title: String,
    /// Series identifier.
    #[diesel(sql_type = Text)]
    pub series_id: String,
    /// Series title.
    #[diesel(sql_type = Text)]
    pub series_title: String,
}

impl Tabular for SharedDirector {
    fn headers() -> &'static [&'static str] {
        &["director", "movie", "series"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.director.clone(),
            format!("{} ({})", self.movie_title, self.movie_id),
            format!("{} ({})", self.series_title, self.series_id),
        ]
    }
}

/// Self-join: directors credited on both a movie and a series.
pub fn shared_director_pairs(
    conn: &mut SqliteConnection,
    limit: i64,
) -> anyhow::Result<Vec<SharedDirector>> {
    let rows = sql_query(
        "SELECT m.director AS director,
                m.show_id AS movie_id, m.title AS movie_title,
                s.show_id AS series_id, s.title AS series_title
         FROM titles m
         JOIN titles s ON s.director = m.director AND s.show_id <> m.show_id
         WHERE m.type = 'Movie' AND s.type = 'TV Show'
           AND TRIM(m.director) <> ''
         ORDER BY m.director, m.show_id, s.show_id
         LIMIT ?",
    )
    .bind::<BigInt, _>(limit)
    .load(conn)?;
    Ok(rows)
}

/// Two rows whose titles match ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct SameTitle {
    /// Title text of the first row.
    #[diesel(sql_type = Text)]
    pub title: String,
    /// Lower identifier of the pair.
    #[diesel(sql_type = Text)]
    pub first_id: String,
    /// Content type of the first row.
    #[diesel(sql_type = Text)]
    pub first_type: String,
    /// Release year of the first row.
    #[diesel(sql_type = Integer)]
    pub first_year: i32,
    /// Higher identifier of the pair.
    #[diesel(sql_type = Text)]
    pub second_id: String,
    /// Content type of the second row.
    #[diesel(sql_type = Text)]
    pub second_type: String,
    /// Release year of the second row.
    #[diesel(sql_type = Integer)]
    pub second_year: i32,
}

impl Tabular for SameTitle {
    fn headers() -> &'static [&'static str] {
        &["title", "first", "second"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            format!("{} {} {}", self.first_id, self.first_type, self.first_year),
            format!("{} {} {}", self.second_id, self.second_type, self.second_year),
        ]
    }
}

/// Self-join: distinct identifiers sharing a title (remakes, movie/series pairs).
pub fn same_title_pairs(
    conn: &mut SqliteConnection,
    limit: i64,
) -> anyhow::Result<Vec<SameTitle>> {
    let rows = sql_query(
        "SELECT a.title AS title,
                a.show_id AS first_id, a.type AS first_type, a.release_year AS first_year,
                b.show_id AS second_id, b.type AS second_type, b.release_year AS second_year
         FROM titles a
         JOIN titles b ON LOWER(a.title) = LOWER(b.title) AND a.show_id < b.show_id
         ORDER BY a.title, a.show_id, b.show_id
         LIMIT ?",
    )
    .bind::<BigInt, _>(limit)
    .load(conn)?;
    Ok(rows)
}
