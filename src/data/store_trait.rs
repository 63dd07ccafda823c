use ahash::AHashSet;

use crate::data::{Complete, EntityId, EntitySchema, EntityType, Record};
use crate::Result;

/// Answers hierarchy queries against the current persisted state.
pub trait AncestorProvider {
    /// Ancestors of `entity_id` ordered nearest first, optionally starting
    /// with the entity itself. The sequence is always finite.
    fn ancestors_of(&self, entity_id: EntityId, include_self: bool) -> Result<Vec<Record>>;

    /// Direct children of `entity_id`.
    fn children_of(&self, entity_id: EntityId) -> Result<Vec<EntityId>>;

    /// All descendants of `entity_id`, parents before their children.
    fn descendants_of(&self, entity_id: EntityId) -> Result<Vec<EntityId>> {
        let mut seen = AHashSet::new();
        seen.insert(entity_id);

        let mut descendants = Vec::new();
        let mut frontier = vec![entity_id];
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for id in frontier {
                for child in self.children_of(id)? {
                    if seen.insert(child) {
                        descendants.push(child);
                        next.push(child);
                    }
                }
            }
            frontier = next;
        }

        Ok(descendants)
    }
}

/// Create, read and update of raw records.
pub trait Persistence {
    fn load(&self, entity_id: EntityId) -> Result<Record>;

    /// Creates the record when it has no id yet, updates it otherwise.
    /// Returns the record as stored, id included.
    fn write(&mut self, record: &Record) -> Result<Record>;
}

/// Everything the inheritance engine needs from a backing store.
pub trait StoreTrait: AncestorProvider + Persistence {
    fn get_complete_entity_schema(&self, entity_type: &EntityType) -> Result<&EntitySchema<Complete>>;
}
