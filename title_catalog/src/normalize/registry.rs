//! Distinct-value registry: de-duplication and surrogate id assignment.

use indexmap::IndexMap;

use super::{Entity, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    id: EntityId,
    count: i32,
}

/// Registry of distinct values for one entity type.
///
/// Ids come from an explicit counter starting at 1 and follow first-registration
/// order. Values are compared exactly; callers trim before registering.
#[derive(Debug, Clone)]
pub struct Registry {
    slots: IndexMap<String, Slot>,
    next_id: EntityId,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Empty registry; the first registered value gets id 1.
    pub fn new() -> Self {
        Self {
            slots: IndexMap::new(),
            next_id: 1,
        }
    }

    /// Register one occurrence of `text` and return its id.
    ///
    /// Known values have their reference count incremented; new values get the
    /// next id and a count of 1.
    pub fn register(&mut self, text: &str) -> EntityId {
        if let Some(slot) = self.slots.get_mut(text) {
            slot.count += 1;
            return slot.id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.slots.insert(text.to_string(), Slot { id, count: 1 });
        id
    }

    /// Id of `text`, if registered.
    pub fn get(&self, text: &str) -> Option<EntityId> {
        self.slots.get(text).map(|s| s.id)
    }

    /// Reference count of `text` (0 when unknown).
    pub fn count(&self, text: &str) -> i32 {
        self.slots.get(text).map_or(0, |s| s.count)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate `(id, text, count)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &str, i32)> {
        self.slots.iter().map(|(k, s)| (s.id, k.as_str(), s.count))
    }

    /// Consume the registry into the entity table, in id order.
    pub fn into_entities(self) -> Vec<Entity> {
        self.slots
            .into_iter()
            .map(|(name, s)| Entity {
                id: s.id,
                name,
                title_count: s.count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn assigns_monotonic_ids_from_one() {
        let mut r = Registry::new();
        assert!(r.is_empty());
        assert_eq!(r.register("France"), 1);
        assert_eq!(r.register("Poland"), 2);
        assert_eq!(r.register("France"), 1);
        assert_eq!(r.len(), 2);
        assert_eq!(r.count("France"), 2);
        assert_eq!(r.count("Poland"), 1);
        assert_eq!(r.count("Chile"), 0);
        assert_eq!(r.get("Poland"), Some(2));
        assert_eq!(r.get("Chile"), None);
    }

    #[test]
    fn entities_come_out_in_id_order() {
        let mut r = Registry::new();
        for v in ["b", "a", "b", "c"] {
            r.register(v);
        }
        let ents = r.into_entities();
        let got: Vec<_> = ents
            .iter()
            .map(|e| (e.id, e.name.as_str(), e.title_count))
            .collect();
        assert_eq!(got, vec![(1, "b", 2), (2, "a", 1), (3, "c", 1)]);
    }

    proptest! {
        #[test]
        fn counts_sum_to_registrations(values in proptest::collection::vec("[a-d]{1,2}", 0..40)) {
            let mut r = Registry::new();
            for v in &values {
                r.register(v);
            }
            let total: i32 = r.iter().map(|(_, _, c)| c).sum();
            prop_assert_eq!(total as usize, values.len());

            // ids are exactly 1..=len
            let ids: Vec<_> = r.iter().map(|(id, _, _)| id).collect();
            let expected: Vec<_> = (1..=r.len() as i32).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
