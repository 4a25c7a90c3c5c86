//! Junction construction: one `(title, entity)` pair per distinct value per title.

use std::collections::HashSet;

use super::{JunctionPair, Normalized, registry::Registry, split::split_delimited};

/// Incremental builder over titles in load order.
///
/// A pair is emitted at most once, also when a title repeats a value in its own
/// list or when two rows share a `show_id`. A value's reference count is bumped
/// only when its pair is new, so counts always equal the number of pairs.
#[derive(Debug)]
pub struct JunctionBuilder<'a> {
    sep: &'a str,
    registry: Registry,
    seen: HashSet<(&'a str, &'a str)>,
    pairs: Vec<JunctionPair>,
    titles_scanned: usize,
    titles_with_values: usize,
}

impl<'a> JunctionBuilder<'a> {
    /// New builder splitting on `sep`.
    pub fn new(sep: &'a str) -> Self {
        Self {
            sep,
            registry: Registry::new(),
            seen: HashSet::new(),
            pairs: Vec::new(),
            titles_scanned: 0,
            titles_with_values: 0,
        }
    }

    /// Feed one title's list cell. Returns the number of new pairs emitted.
    pub fn push(&mut self, show_id: &'a str, field: Option<&'a str>) -> usize {
        self.titles_scanned += 1;
        let mut emitted = 0;
        let values = split_delimited(field, self.sep);
        if !values.is_empty() {
            self.titles_with_values += 1;
        }
        for value in values {
            if !self.seen.insert((show_id, value)) {
                continue;
            }
            let entity_id = self.registry.register(value);
            self.pairs.push(JunctionPair {
                show_id: show_id.to_string(),
                entity_id,
            });
            emitted += 1;
        }
        emitted
    }

    /// Registry state so far.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Titles fed so far.
    pub fn titles_scanned(&self) -> usize {
        self.titles_scanned
    }

    /// Titles whose cell yielded at least one value.
    pub fn titles_with_values(&self) -> usize {
        self.titles_with_values
    }

    /// Finish into the entity table and junction relation.
    pub fn finish(self) -> Normalized {
        Normalized {
            entities: self.registry.into_entities(),
            pairs: self.pairs,
        }
    }
}

/// Build the junction relation for `rows` of `(show_id, list cell)` in one pass.
///
/// ```
/// use title_catalog::normalize::{LIST_SEPARATOR, junction::build_junction};
///
/// let rows = [("s1", Some("France, Poland")), ("s2", Some("Poland"))];
/// let n = build_junction(rows, LIST_SEPARATOR);
/// assert_eq!(n.entity("Poland").unwrap().title_count, 2);
/// assert_eq!(n.entity("France").unwrap().title_count, 1);
/// ```
pub fn build_junction<'a, I>(rows: I, sep: &'a str) -> Normalized
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut builder = JunctionBuilder::new(sep);
    for (show_id, field) in rows {
        builder.push(show_id, field);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::LIST_SEPARATOR;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn within_title_repeats_collapse() {
        let n = build_junction(
            [("s1", Some("United States, India, United States"))],
            LIST_SEPARATOR,
        );
        assert_eq!(n.pairs.len(), 2);
        assert_eq!(n.entity_ids_for("s1"), vec![1, 2]);
        assert_eq!(n.entity("United States").unwrap().title_count, 1);
        assert_eq!(n.entity("India").unwrap().title_count, 1);
    }

    #[test]
    fn empty_and_null_register_nothing() {
        let mut b = JunctionBuilder::new(LIST_SEPARATOR);
        assert_eq!(b.push("s1", Some("")), 0);
        assert_eq!(b.push("s2", None), 0);
        assert_eq!(b.push("s3", Some("  ")), 0);
        assert!(b.registry().is_empty());
        assert_eq!(b.titles_scanned(), 3);
        assert_eq!(b.titles_with_values(), 0);

        let n = b.finish();
        assert!(n.pairs.is_empty());
        assert!(n.entities.is_empty());
    }

    #[test]
    fn counts_across_titles() {
        let n = build_junction(
            [("s1", Some("France, Poland")), ("s2", Some("Poland"))],
            LIST_SEPARATOR,
        );
        let poland = n.entity("Poland").unwrap();
        let france = n.entity("France").unwrap();
        assert_eq!((france.id, france.title_count), (1, 1));
        assert_eq!((poland.id, poland.title_count), (2, 2));
        assert_eq!(n.pairs.len(), 3);
    }

    #[test]
    fn duplicate_show_ids_do_not_duplicate_pairs() {
        let n = build_junction(
            [("s1", Some("France")), ("s1", Some("France, Chile"))],
            LIST_SEPARATOR,
        );
        assert_eq!(n.pairs.len(), 2);
        assert_eq!(n.entity("France").unwrap().title_count, 1);
        assert_eq!(n.entity("Chile").unwrap().title_count, 1);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<(String, Option<String>)>> {
        proptest::collection::vec(
            (
                "s[0-9]{1,2}",
                proptest::option::of(proptest::collection::vec("(France|Chile|India| )?", 0..5)),
            )
                .prop_map(|(id, vals)| (id, vals.map(|v| v.join(LIST_SEPARATOR)))),
            0..20,
        )
    }

    proptest! {
        #[test]
        fn relation_has_no_duplicate_pairs(rows in arb_rows()) {
            let n = build_junction(
                rows.iter().map(|(id, f)| (id.as_str(), f.as_deref())),
                LIST_SEPARATOR,
            );
            let distinct: BTreeSet<_> = n.pairs.iter().collect();
            prop_assert_eq!(distinct.len(), n.pairs.len());
        }

        #[test]
        fn counts_match_distinct_titles(rows in arb_rows()) {
            let n = build_junction(
                rows.iter().map(|(id, f)| (id.as_str(), f.as_deref())),
                LIST_SEPARATOR,
            );

            // independent oracle: value -> set of titles containing it
            let mut oracle: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
            for (id, f) in &rows {
                for v in split_delimited(f.as_deref(), LIST_SEPARATOR) {
                    oracle.entry(v).or_default().insert(id.as_str());
                }
            }
            prop_assert_eq!(n.entities.len(), oracle.len());
            for e in &n.entities {
                let refs = n.pairs.iter().filter(|p| p.entity_id == e.id).count();
                prop_assert_eq!(e.title_count as usize, refs);
                prop_assert_eq!(e.title_count as usize, oracle[e.name.as_str()].len());
            }
        }

        #[test]
        fn rebuild_is_deterministic(rows in arb_rows()) {
            let a = build_junction(
                rows.iter().map(|(id, f)| (id.as_str(), f.as_deref())),
                LIST_SEPARATOR,
            );
            let b = build_junction(
                rows.iter().map(|(id, f)| (id.as_str(), f.as_deref())),
                LIST_SEPARATOR,
            );
            prop_assert_eq!(a, b);
        }
    }
}
