//! Per-entity rating share with a post-aggregation threshold.
//!
//! For every country (or genre) the query counts *all* titles referencing it and
//! the subset carrying the requested rating. The `min_titles` threshold is a
//! `HAVING` filter applied after grouping, so the denominators always cover the
//! full population even though only large-enough groups are returned.

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Text};

use super::{Tabular, percentage};
use crate::normalize::DelimitedField;

#[derive(QueryableByName)]
struct ShareRow {
    #[diesel(sql_type = Integer)]
    entity_id: i32,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = BigInt)]
    matching: i64,
}

/// Share of one rating among an entity's titles.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityShare {
    /// Entity id.
    pub entity_id: i32,
    /// Entity name.
    pub name: String,
    /// All titles referencing the entity.
    pub total: i64,
    /// Those with the requested rating.
    pub matching: i64,
    /// `matching * 100 / total`, rounded.
    pub percent: f64,
}

impl Tabular for EntityShare {
    fn headers() -> &'static [&'static str] {
        &["name", "titles", "matching", "percent"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.total.to_string(),
            self.matching.to_string(),
            format!("{}%", self.percent),
        ]
    }
}

/// Share of `rating` per entity of `field`, for entities with at least `min_titles` titles.
///
/// Ordered by share (highest first), then by total titles and name.
pub fn rating_share(
    conn: &mut SqliteConnection,
    field: DelimitedField,
    rating: &str,
    min_titles: i64,
    precision: u32,
) -> anyhow::Result<Vec<EntityShare>> {
    let q = format!(
        "SELECT e.id AS entity_id, e.name AS name,
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN t.rating = ? THEN 1 ELSE 0 END), 0) AS matching
         FROM {junction} j
         JOIN {entity} e ON e.id = j.{fk}
         JOIN titles t ON t.show_id = j.show_id
         GROUP BY e.id, e.name
         HAVING COUNT(*) >= ?
         ORDER BY matching * 1.0 / total DESC, total DESC, e.name",
        junction = field.junction_table(),
        entity = field.entity_table(),
        fk = field.junction_fk(),
    );

    let rows: Vec<ShareRow> = sql_query(q)
        .bind::<Text, _>(rating)
        .bind::<BigInt, _>(min_titles)
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|r| EntityShare {
            percent: percentage(r.matching, r.total, precision),
            entity_id: r.entity_id,
            name: r.name,
            total: r.total,
            matching: r.matching,
        })
        .collect())
}
