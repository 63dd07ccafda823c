use std::marker::PhantomData;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::data::{ft, EntityType, FieldSchema, FieldType, Value};

/// Schema as declared for one type, without fields from its base types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Single;

/// Schema merged along the base type chain. Only the registry builds these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Complete;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema<T> {
    pub entity_type: EntityType,
    pub inherit: Option<EntityType>,
    /// The reference field inheritance walks upward along.
    pub parent_field: Option<FieldType>,
    pub fields: FxHashMap<FieldType, FieldSchema>,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl EntitySchema<Single> {
    pub fn new(entity_type: impl Into<EntityType>, inherit: Option<EntityType>) -> Self {
        EntitySchema {
            entity_type: entity_type.into(),
            inherit,
            parent_field: None,
            fields: FxHashMap::default(),
            _marker: PhantomData,
        }
    }

    /// A schema with the standard `Name` and `Parent` fields, where `Parent`
    /// is the inheritance edge.
    pub fn hierarchical(entity_type: impl Into<EntityType>, inherit: Option<EntityType>) -> Self {
        Self::new(entity_type, inherit)
            .with_field(FieldSchema::string(ft::NAME, 0))
            .with_field(FieldSchema::entity_reference(ft::PARENT, 1))
            .with_parent_field(ft::PARENT)
    }

    pub fn with_field(mut self, field_schema: FieldSchema) -> Self {
        self.fields
            .insert(field_schema.field_type.clone(), field_schema);
        self
    }

    pub fn with_parent_field(mut self, field_type: impl Into<FieldType>) -> Self {
        self.parent_field = Some(field_type.into());
        self
    }

    pub(crate) fn into_complete(self) -> EntitySchema<Complete> {
        EntitySchema {
            entity_type: self.entity_type,
            inherit: self.inherit,
            parent_field: self.parent_field,
            fields: self.fields,
            _marker: PhantomData,
        }
    }
}

impl<T> EntitySchema<T> {
    pub fn field(&self, field_type: &FieldType) -> Option<&FieldSchema> {
        self.fields.get(field_type)
    }

    /// Inheritable field names ordered by rank, then name.
    pub fn inheritable_fields(&self) -> Vec<FieldType> {
        self.fields
            .values()
            .filter(|schema| schema.inheritable)
            .sorted_by(|a, b| {
                a.rank
                    .cmp(&b.rank)
                    .then_with(|| a.field_type.cmp(&b.field_type))
            })
            .map(|schema| schema.field_type.clone())
            .collect()
    }

    pub fn is_inheritable(&self, field_type: &FieldType) -> bool {
        self.fields
            .get(field_type)
            .map(|schema| schema.inheritable)
            .unwrap_or(false)
    }

    /// Undeclared fields are never empty: they are not ours to resolve.
    pub fn is_empty(&self, field_type: &FieldType, value: &Value) -> bool {
        self.fields
            .get(field_type)
            .map(|schema| schema.is_empty(value))
            .unwrap_or(false)
    }
}
