use ahash::AHashSet;
use rustc_hash::FxHashMap;

use crate::data::{
    now, AncestorProvider, Complete, EntityId, EntitySchema, EntityType, Persistence, Record,
    SchemaRegistry, Single, Snowflake, StoreConfig, StoreTrait,
};
use crate::{EntityNotFound, EntityTypeChanged, FieldNotFound, Result, ValueTypeMismatch};

/// In-memory hierarchical record store.
///
/// Parent links are plain reference fields; ancestors are found by hopping
/// from parent to parent, and a children index is kept for downward queries.
pub struct MapStore {
    registry: SchemaRegistry,
    records: FxHashMap<EntityId, Record>,
    children: FxHashMap<EntityId, Vec<EntityId>>,
    snowflake: Snowflake,
    config: StoreConfig,
}

impl Default for MapStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MapStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::from_env())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        MapStore {
            registry: SchemaRegistry::new(),
            records: FxHashMap::default(),
            children: FxHashMap::default(),
            snowflake: Snowflake::from(config.node_id),
            config,
        }
    }

    /// Set or update the schema for an entity type
    pub fn set_entity_schema(&mut self, schema: EntitySchema<Single>) -> Result<()> {
        self.registry.set_entity_schema(schema)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    fn parent_of(&self, record: &Record) -> Result<Option<EntityId>> {
        let schema = self.registry.get_complete_entity_schema(&record.entity_type)?;
        Ok(schema
            .parent_field
            .as_ref()
            .and_then(|parent_field| record.reference(parent_field)))
    }

    /// Checks a record against its complete schema and fills missing fields
    /// with their defaults. The parent must be one of `records`.
    fn validate(&self, record: &Record, records: &FxHashMap<EntityId, Record>) -> Result<Record> {
        let schema = self.registry.get_complete_entity_schema(&record.entity_type)?;

        for (field_type, value) in record.fields.iter() {
            let field_schema = schema
                .field(field_type)
                .ok_or_else(|| FieldNotFound(record.entity_type.clone(), field_type.clone()))?;

            if !field_schema.accepts(value) {
                return Err(ValueTypeMismatch(
                    record.entity_type.clone(),
                    field_type.clone(),
                    field_schema.default_value.clone(),
                    value.clone(),
                )
                .into());
            }
        }

        let mut validated = record.clone();
        for field_schema in schema.fields.values() {
            validated
                .fields
                .entry(field_schema.field_type.clone())
                .or_insert_with(|| field_schema.default_value.clone());
        }

        if let Some(parent) = self.parent_of(&validated)? {
            if !records.contains_key(&parent) {
                return Err(EntityNotFound(parent).into());
            }
        }

        Ok(validated)
    }

    fn unlink(
        children: &mut FxHashMap<EntityId, Vec<EntityId>>,
        entity_id: EntityId,
        parent: Option<EntityId>,
    ) {
        if let Some(parent) = parent {
            if let Some(siblings) = children.get_mut(&parent) {
                siblings.retain(|child| *child != entity_id);
            }
        }
    }

    fn link(
        children: &mut FxHashMap<EntityId, Vec<EntityId>>,
        entity_id: EntityId,
        parent: Option<EntityId>,
    ) {
        if let Some(parent) = parent {
            let siblings = children.entry(parent).or_default();
            if !siblings.contains(&entity_id) {
                siblings.push(entity_id);
            }
        }
    }

    /// Replaces every record at once, keeping their ids and write times.
    ///
    /// Each record is validated as a write would be, with parents looked up
    /// among the replacement records. Nothing changes unless all of them pass.
    pub(crate) fn replace_records(&mut self, records: &[Record]) -> Result<()> {
        let mut replacement = FxHashMap::default();
        for record in records {
            let entity_id = record
                .entity_id
                .ok_or_else(|| FieldNotFound(record.entity_type.clone(), "Id".into()))?;
            replacement.insert(entity_id, record.clone());
        }

        let mut validated = FxHashMap::default();
        let mut links = Vec::with_capacity(replacement.len());
        for (entity_id, record) in replacement.iter() {
            let record = self.validate(record, &replacement)?;
            links.push((*entity_id, self.parent_of(&record)?));
            validated.insert(*entity_id, record);
        }

        let mut children = FxHashMap::default();
        links.sort();
        for (entity_id, parent) in links {
            Self::link(&mut children, entity_id, parent);
        }

        self.records = validated;
        self.children = children;
        Ok(())
    }
}

impl Persistence for MapStore {
    fn load(&self, entity_id: EntityId) -> Result<Record> {
        self.records
            .get(&entity_id)
            .cloned()
            .ok_or_else(|| EntityNotFound(entity_id).into())
    }

    fn write(&mut self, record: &Record) -> Result<Record> {
        let mut stored = self.validate(record, &self.records)?;

        let (entity_id, previous_parent) = match record.entity_id {
            Some(entity_id) => {
                let existing = self
                    .records
                    .get(&entity_id)
                    .ok_or(EntityNotFound(entity_id))?;
                if existing.entity_type != record.entity_type {
                    return Err(EntityTypeChanged(
                        entity_id,
                        existing.entity_type.clone(),
                        record.entity_type.clone(),
                    )
                    .into());
                }
                (entity_id, self.parent_of(existing)?)
            }
            None => (self.snowflake.next_entity_id(), None),
        };

        let parent = self.parent_of(&stored)?;
        stored.entity_id = Some(entity_id);
        stored.write_time = Some(now());

        if previous_parent != parent {
            Self::unlink(&mut self.children, entity_id, previous_parent);
        }
        Self::link(&mut self.children, entity_id, parent);
        self.records.insert(entity_id, stored.clone());

        log::debug!("Wrote {} {}", stored.entity_type, entity_id);
        Ok(stored)
    }
}

impl AncestorProvider for MapStore {
    fn ancestors_of(&self, entity_id: EntityId, include_self: bool) -> Result<Vec<Record>> {
        let start = self.load(entity_id)?;

        let mut visited = AHashSet::new();
        visited.insert(entity_id);

        let mut current = self.parent_of(&start)?;
        let mut ancestors = Vec::new();
        if include_self {
            ancestors.push(start);
        }

        let mut depth = 0;
        while let Some(parent) = current {
            if depth >= self.config.max_ancestor_depth {
                log::warn!(
                    "Ancestor chain of {} truncated at depth {}",
                    entity_id,
                    self.config.max_ancestor_depth
                );
                break;
            }

            if !visited.insert(parent) {
                log::warn!("Cycle in hierarchy above {} at {}", entity_id, parent);
                break;
            }

            let record = self.load(parent)?;
            current = self.parent_of(&record)?;
            ancestors.push(record);
            depth += 1;
        }

        Ok(ancestors)
    }

    fn children_of(&self, entity_id: EntityId) -> Result<Vec<EntityId>> {
        if !self.records.contains_key(&entity_id) {
            return Err(EntityNotFound(entity_id).into());
        }

        Ok(self.children.get(&entity_id).cloned().unwrap_or_default())
    }
}

impl StoreTrait for MapStore {
    fn get_complete_entity_schema(&self, entity_type: &EntityType) -> Result<&EntitySchema<Complete>> {
        self.registry.get_complete_entity_schema(entity_type)
    }
}
