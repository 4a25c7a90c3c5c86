//! Normalization of delimited multi-value columns into entity + junction tables.
//!
//! ## What this does
//! - [`split::split_delimited`] turns a cell like `"France, Poland"` into trimmed atomic values.
//! - [`registry::Registry`] de-duplicates values and assigns surrogate ids from an
//!   explicit counter, starting at 1, in first-seen order.
//! - [`junction::build_junction`] walks titles in load order and emits one
//!   `(show_id, entity_id)` pair per distinct value per title.
//! - [`store::normalize_field`] reads `titles`, builds the relation in memory, and
//!   replaces the derived tables in one immediate transaction.
//!
//! ## Determinism
//! Titles are read in `rowid` (insertion) order and values in split order, so two
//! runs over the same flat table assign identical ids and produce identical pairs.

pub mod junction;
pub mod registry;
pub mod split;
pub mod store;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Separator used by the dataset's list columns.
pub const LIST_SEPARATOR: &str = ", ";

/// Surrogate identifier of a normalized entity.
pub type EntityId = i32;

/// A flat-table column that holds a delimited list and has a normalized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimitedField {
    /// `titles.country` → `country` / `title_country`.
    Country,
    /// `titles.listed_in` → `genre` / `title_genre`.
    Genre,
}

impl DelimitedField {
    /// Every normalized field, in the order `normalize --field all` processes them.
    pub const ALL: [DelimitedField; 2] = [DelimitedField::Country, DelimitedField::Genre];

    /// Source column in `titles`.
    pub fn source_column(self) -> &'static str {
        match self {
            DelimitedField::Country => "country",
            DelimitedField::Genre => "listed_in",
        }
    }

    /// Entity table name.
    pub fn entity_table(self) -> &'static str {
        match self {
            DelimitedField::Country => "country",
            DelimitedField::Genre => "genre",
        }
    }

    /// Junction table name.
    pub fn junction_table(self) -> &'static str {
        match self {
            DelimitedField::Country => "title_country",
            DelimitedField::Genre => "title_genre",
        }
    }

    /// Entity FK column in the junction table.
    pub fn junction_fk(self) -> &'static str {
        match self {
            DelimitedField::Country => "country_id",
            DelimitedField::Genre => "genre_id",
        }
    }
}

impl fmt::Display for DelimitedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DelimitedField::Country => "country",
            DelimitedField::Genre => "genre",
        })
    }
}

impl FromStr for DelimitedField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "country" | "countries" => Ok(DelimitedField::Country),
            "genre" | "genres" | "listed_in" => Ok(DelimitedField::Genre),
            other => anyhow::bail!("unknown delimited field {other:?} (expected country or genre)"),
        }
    }
}

/// One normalized value with its id and reference count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Registry-assigned surrogate id.
    pub id: EntityId,
    /// Trimmed value text.
    pub name: String,
    /// Number of titles referencing it.
    pub title_count: i32,
}

/// One `(title, entity)` pair of the junction relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JunctionPair {
    /// Title identifier.
    pub show_id: String,
    /// Entity identifier.
    pub entity_id: EntityId,
}

/// In-memory result of one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Normalized {
    /// Entity table in id order.
    pub entities: Vec<Entity>,
    /// Junction relation in emission order.
    pub pairs: Vec<JunctionPair>,
}

impl Normalized {
    /// Look up an entity by its text.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Entity ids referenced by one title, in emission order.
    pub fn entity_ids_for(&self, show_id: &str) -> Vec<EntityId> {
        self.pairs
            .iter()
            .filter(|p| p.show_id == show_id)
            .map(|p| p.entity_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for f in DelimitedField::ALL {
            assert_eq!(f.to_string().parse::<DelimitedField>().unwrap(), f);
        }
        assert_eq!("listed_in".parse::<DelimitedField>().unwrap(), DelimitedField::Genre);
        assert!("cast".parse::<DelimitedField>().is_err());
    }
}
