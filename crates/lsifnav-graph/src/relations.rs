//! Result set links and items.
//!
//! Everything LSIF says about which ranges belong to which result lives
//! here, keyed by id. The ranges themselves are in the store.

use lsifnav_core::Id;
use std::collections::{BTreeSet, HashMap};

/// Ranges of one document that belong to a definition or reference result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Document containing the ranges.
    pub document: Id,
    /// Range ids in dump order.
    pub ranges: Vec<Id>,
}

/// In-memory links between result sets, results and items.
///
/// Result sets exist only as keys here. Sized by the number of results,
/// which is small next to the number of ranges.
#[derive(Debug, Default, Clone)]
pub struct Relations {
    /// Result set -> definition result.
    definitions: HashMap<Id, Id>,

    /// Result set -> reference result.
    references: HashMap<Id, Id>,

    /// Definition or reference result -> owning result set.
    owners: HashMap<Id, Id>,

    /// Result -> items in arrival order.
    items: HashMap<Id, Vec<Item>>,

    /// Results whose items arrived before their result set link.
    deferred: BTreeSet<Id>,
}

impl Relations {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `result_set -> definition_result`. A later link replaces it.
    pub fn link_definition(&mut self, result_set: Id, definition_result: Id) {
        if let Some(previous) = self.definitions.insert(result_set, definition_result) {
            self.release(previous, result_set);
        }
        self.owners.insert(definition_result, result_set);
    }

    /// Records `result_set -> reference_result`. A later link replaces it.
    pub fn link_reference(&mut self, result_set: Id, reference_result: Id) {
        if let Some(previous) = self.references.insert(result_set, reference_result) {
            self.release(previous, result_set);
        }
        self.owners.insert(reference_result, result_set);
    }

    /// Drops the reverse link of `result` if it still points at `result_set`.
    fn release(&mut self, result: Id, result_set: Id) {
        if self.owners.get(&result) == Some(&result_set) {
            self.owners.remove(&result);
        }
    }

    /// Appends an item to `result`.
    pub fn add_item(&mut self, result: Id, ranges: Vec<Id>, document: Id) {
        self.items
            .entry(result)
            .or_default()
            .push(Item { document, ranges });
    }

    pub fn definition_of(&self, result_set: Id) -> Option<Id> {
        self.definitions.get(&result_set).copied()
    }

    pub fn references_of(&self, result_set: Id) -> Option<Id> {
        self.references.get(&result_set).copied()
    }

    /// Result set that links to `result`, if that link has been seen.
    pub fn result_set_of(&self, result: Id) -> Option<Id> {
        self.owners.get(&result).copied()
    }

    /// Items of `result` in arrival order.
    pub fn items(&self, result: Id) -> &[Item] {
        self.items.get(&result).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remembers that `result` has items whose owner could not be resolved.
    pub fn defer(&mut self, result: Id) {
        self.deferred.insert(result);
    }

    /// Deferred results in id order.
    pub fn deferred(&self) -> Vec<Id> {
        self.deferred.iter().copied().collect()
    }

    /// Marks `result` as resolved.
    pub fn undefer(&mut self, result: Id) {
        self.deferred.remove(&result);
    }

    /// Number of result sets with at least one link.
    pub fn result_set_count(&self) -> usize {
        let mut count = self.definitions.len();
        count += self
            .references
            .keys()
            .filter(|rs| !self.definitions.contains_key(*rs))
            .count();
        count
    }

    /// Number of items recorded.
    pub fn item_count(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> Id {
        Id::new(n)
    }

    #[test]
    fn test_link_and_reverse_lookup() {
        let mut relations = Relations::new();
        relations.link_definition(id(4), id(6));
        relations.link_reference(id(4), id(5));

        assert_eq!(relations.definition_of(id(4)), Some(id(6)));
        assert_eq!(relations.references_of(id(4)), Some(id(5)));
        assert_eq!(relations.result_set_of(id(6)), Some(id(4)));
        assert_eq!(relations.result_set_of(id(5)), Some(id(4)));
        assert_eq!(relations.result_set_of(id(7)), None);
        assert_eq!(relations.result_set_count(), 1);
    }

    #[test]
    fn test_relink_replaces() {
        let mut relations = Relations::new();
        relations.link_definition(id(4), id(6));
        relations.link_definition(id(4), id(8));

        assert_eq!(relations.definition_of(id(4)), Some(id(8)));
        assert_eq!(relations.result_set_of(id(8)), Some(id(4)));
        assert_eq!(relations.result_set_of(id(6)), None);
    }

    #[test]
    fn test_items_keep_arrival_order() {
        let mut relations = Relations::new();
        relations.add_item(id(5), vec![id(1), id(15)], id(6));
        relations.add_item(id(5), vec![id(2)], id(7));
        relations.add_item(id(5), vec![id(3)], id(7));

        let items = relations.items(id(5));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].ranges, vec![id(1), id(15)]);
        assert_eq!(items[0].document, id(6));
        assert_eq!(items[2].ranges, vec![id(3)]);
        assert!(relations.items(id(6)).is_empty());
        assert_eq!(relations.item_count(), 3);
    }

    #[test]
    fn test_deferred_results_are_unique() {
        let mut relations = Relations::new();
        relations.defer(id(5));
        relations.defer(id(5));
        relations.defer(id(6));

        assert_eq!(relations.deferred(), vec![id(5), id(6)]);
        // reading does not drain
        assert_eq!(relations.deferred(), vec![id(5), id(6)]);

        relations.undefer(id(5));
        assert_eq!(relations.deferred(), vec![id(6)]);
        relations.undefer(id(6));
        assert!(relations.deferred().is_empty());
    }

    #[test]
    fn test_relink_keeps_other_owner() {
        let mut relations = Relations::new();
        relations.link_reference(id(4), id(5));
        // a second result set claims reference result 5
        relations.link_reference(id(9), id(5));
        // result set 4 moves on; 5 still belongs to 9
        relations.link_reference(id(4), id(7));

        assert_eq!(relations.result_set_of(id(5)), Some(id(9)));
        assert_eq!(relations.result_set_of(id(7)), Some(id(4)));

        relations.link_definition(id(4), id(6));
        relations.link_definition(id(9), id(6));
        relations.link_definition(id(4), id(8));
        assert_eq!(relations.result_set_of(id(6)), Some(id(9)));
        assert_eq!(relations.result_set_of(id(8)), Some(id(4)));
    }
}
