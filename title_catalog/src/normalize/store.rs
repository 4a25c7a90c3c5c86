//! Persistence of the normalized relations.
//!
//! The derived tables are write-once per pass: [`normalize_field`] deletes the
//! previous junction and entity rows and inserts the freshly built ones inside a
//! single `BEGIN IMMEDIATE` transaction, so readers see either the old or the new
//! relation, never a mix.

use std::fmt;

use anyhow::Context;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use tracing::{debug, info};

use super::{DelimitedField, Entity, JunctionPair, Normalized, junction::JunctionBuilder};
use crate::models::{Country, Genre, NewCountry, NewGenre, TitleCountry, TitleGenre};
use crate::schema::{country, genre, title_country, title_genre, titles};

/// Rows per multi-row INSERT; keeps bind parameters well under SQLite's limit.
const INSERT_CHUNK: usize = 500;

/// Outcome of one [`normalize_field`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// Which column was normalized.
    pub field: DelimitedField,
    /// Flat-table rows read.
    pub titles_scanned: usize,
    /// Rows whose cell produced at least one value.
    pub titles_with_values: usize,
    /// Distinct entities written.
    pub entities: usize,
    /// Junction pairs written.
    pub pairs: usize,
}

impl fmt::Display for NormalizeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} titles scanned ({} with values) -> {} {} / {} {} rows",
            self.field,
            self.titles_scanned,
            self.titles_with_values,
            self.entities,
            self.field.entity_table(),
            self.pairs,
            self.field.junction_table(),
        )
    }
}

/// Read `(show_id, cell)` for `field` from `titles`, in load (`rowid`) order.
pub fn read_field_cells(
    conn: &mut SqliteConnection,
    field: DelimitedField,
) -> anyhow::Result<Vec<(String, Option<String>)>> {
    let by_rowid = sql::<Integer>("rowid");
    let rows = match field {
        DelimitedField::Country => titles::table
            .select((titles::show_id, titles::country))
            .order(by_rowid)
            .load::<(String, Option<String>)>(conn)?,
        DelimitedField::Genre => titles::table
            .select((titles::show_id, titles::listed_in))
            .order(by_rowid)
            .load::<(String, Option<String>)>(conn)?,
    };
    Ok(rows)
}

/// Replace the entity and junction tables of `field` with `normalized`.
///
/// Call inside a transaction; [`normalize_field`] does.
pub fn replace_normalized(
    conn: &mut SqliteConnection,
    field: DelimitedField,
    normalized: &Normalized,
) -> anyhow::Result<()> {
    match field {
        DelimitedField::Country => {
            diesel::delete(title_country::table).execute(conn)?;
            diesel::delete(country::table).execute(conn)?;

            let rows: Vec<NewCountry<'_>> = normalized
                .entities
                .iter()
                .map(|e| NewCountry {
                    id: e.id,
                    name: &e.name,
                    title_count: e.title_count,
                })
                .collect();
            for chunk in rows.chunks(INSERT_CHUNK) {
                diesel::insert_into(country::table)
                    .values(chunk)
                    .execute(conn)?;
            }

            let pairs: Vec<TitleCountry> = normalized
                .pairs
                .iter()
                .map(|p| TitleCountry {
                    show_id: p.show_id.clone(),
                    country_id: p.entity_id,
                })
                .collect();
            for chunk in pairs.chunks(INSERT_CHUNK) {
                diesel::insert_into(title_country::table)
                    .values(chunk)
                    .execute(conn)?;
            }
        }
        DelimitedField::Genre => {
            diesel::delete(title_genre::table).execute(conn)?;
            diesel::delete(genre::table).execute(conn)?;

            let rows: Vec<NewGenre<'_>> = normalized
                .entities
                .iter()
                .map(|e| NewGenre {
                    id: e.id,
                    name: &e.name,
                    title_count: e.title_count,
                })
                .collect();
            for chunk in rows.chunks(INSERT_CHUNK) {
                diesel::insert_into(genre::table).values(chunk).execute(conn)?;
            }

            let pairs: Vec<TitleGenre> = normalized
                .pairs
                .iter()
                .map(|p| TitleGenre {
                    show_id: p.show_id.clone(),
                    genre_id: p.entity_id,
                })
                .collect();
            for chunk in pairs.chunks(INSERT_CHUNK) {
                diesel::insert_into(title_genre::table)
                    .values(chunk)
                    .execute(conn)?;
            }
        }
    }
    debug!(
        %field,
        entities = normalized.entities.len(),
        pairs = normalized.pairs.len(),
        "derived tables replaced"
    );
    Ok(())
}

/// Normalize one delimited column of `titles` into its entity + junction tables.
///
/// Reads the flat table in load order, builds the relation in memory with
/// [`JunctionBuilder`], and swaps the derived rows in one immediate transaction.
pub fn normalize_field(
    conn: &mut SqliteConnection,
    field: DelimitedField,
    sep: &str,
) -> anyhow::Result<NormalizeSummary> {
    let summary = conn
        .immediate_transaction::<_, anyhow::Error, _>(|conn| {
            let cells = read_field_cells(conn, field)?;

            let mut builder = JunctionBuilder::new(sep);
            for (show_id, cell) in &cells {
                builder.push(show_id, cell.as_deref());
            }
            let titles_scanned = builder.titles_scanned();
            let titles_with_values = builder.titles_with_values();
            let normalized = builder.finish();

            replace_normalized(conn, field, &normalized)?;

            Ok(NormalizeSummary {
                field,
                titles_scanned,
                titles_with_values,
                entities: normalized.entities.len(),
                pairs: normalized.pairs.len(),
            })
        })
        .with_context(|| format!("normalize {field}"))?;

    info!(
        %field,
        titles = summary.titles_scanned,
        entities = summary.entities,
        pairs = summary.pairs,
        "normalization complete"
    );
    Ok(summary)
}

/// Load the entity table of `field`, in id order.
pub fn load_entities(
    conn: &mut SqliteConnection,
    field: DelimitedField,
) -> anyhow::Result<Vec<Entity>> {
    let entities: Vec<Entity> = match field {
        DelimitedField::Country => country::table
            .select(Country::as_select())
            .order(country::id)
            .load::<Country>(conn)?
            .into_iter()
            .map(Entity::from)
            .collect(),
        DelimitedField::Genre => genre::table
            .select(Genre::as_select())
            .order(genre::id)
            .load::<Genre>(conn)?
            .into_iter()
            .map(Entity::from)
            .collect(),
    };
    Ok(entities)
}

/// Load the junction relation of `field`, ordered by `(show_id, entity_id)`.
pub fn load_pairs(
    conn: &mut SqliteConnection,
    field: DelimitedField,
) -> anyhow::Result<Vec<JunctionPair>> {
    let rows = match field {
        DelimitedField::Country => title_country::table
            .select((title_country::show_id, title_country::country_id))
            .order((title_country::show_id, title_country::country_id))
            .load::<(String, i32)>(conn)?,
        DelimitedField::Genre => title_genre::table
            .select((title_genre::show_id, title_genre::genre_id))
            .order((title_genre::show_id, title_genre::genre_id))
            .load::<(String, i32)>(conn)?,
    };
    Ok(rows
        .into_iter()
        .map(|(show_id, entity_id)| JunctionPair { show_id, entity_id })
        .collect())
}
