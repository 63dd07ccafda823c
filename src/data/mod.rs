mod config;
mod entity;
mod entity_id;
mod entity_schema;
mod error;
mod field_schema;
pub mod ft;
mod json_snapshot;
mod overrides;
mod reconcile;
mod record;
mod resolution;
mod schema_registry;
mod snowflake;
mod store;
mod store_trait;
mod value;

pub use config::StoreConfig;
pub use entity::{create_entity, load_entity, resolve_subtree, InheritableEntity};
pub use entity_id::EntityId;
pub use entity_schema::{Complete, EntitySchema, Single};
pub use error::{
    BadValueCast, EntityNotFound, EntityTypeChanged, EntityTypeNotFound, FieldNotFound,
    FieldNotInheritable, InheritanceNotSupported, ResolutionFailed, ValueTypeMismatch,
};
pub use field_schema::FieldSchema;
pub use json_snapshot::JsonSnapshot;
pub use overrides::{apply_overrides, FieldOverride, OverrideState};
pub use reconcile::{fields_to_empty, save};
pub use record::Record;
pub use resolution::{resolve, Resolution};
pub use schema_registry::SchemaRegistry;
pub use snowflake::Snowflake;
pub use store::MapStore;
pub use store_trait::{AncestorProvider, Persistence, StoreTrait};
pub use value::Value;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EntityType(pub String);

impl EntityType {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        EntityType(s.to_string())
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        EntityType(s)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct FieldType(pub String);

impl FieldType {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        FieldType(s.to_string())
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        FieldType(s)
    }
}

impl From<&FieldType> for FieldType {
    fn from(f: &FieldType) -> Self {
        f.clone()
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub type Timestamp = time::OffsetDateTime;

pub fn now() -> Timestamp {
    time::OffsetDateTime::now_utc()
}

pub fn epoch() -> Timestamp {
    time::OffsetDateTime::UNIX_EPOCH
}
