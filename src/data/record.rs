use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::data::{EntityId, EntityType, FieldType, Timestamp, Value};

/// A record exactly as the persistence layer stores it.
///
/// Inheritable fields hold either an explicit override or their empty
/// sentinel; inherited values are never written here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub entity_id: Option<EntityId>,
    pub entity_type: EntityType,
    pub fields: FxHashMap<FieldType, Value>,
    pub write_time: Option<Timestamp>,
}

impl Record {
    pub fn new(entity_type: impl Into<EntityType>) -> Self {
        Record {
            entity_id: None,
            entity_type: entity_type.into(),
            fields: FxHashMap::default(),
            write_time: None,
        }
    }

    pub fn with_value(mut self, field_type: impl Into<FieldType>, value: impl Into<Value>) -> Self {
        self.fields.insert(field_type.into(), value.into());
        self
    }

    pub fn get(&self, field_type: &FieldType) -> Option<&Value> {
        self.fields.get(field_type)
    }

    /// Follows the given reference field; anything but a set reference is `None`.
    pub fn reference(&self, field_type: &FieldType) -> Option<EntityId> {
        match self.fields.get(field_type) {
            Some(Value::EntityReference(reference)) => *reference,
            _ => None,
        }
    }
}
