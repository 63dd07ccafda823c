pub mod data;

pub use data::{
    apply_overrides, create_entity, fields_to_empty, load_entity, resolve, resolve_subtree, save,
    AncestorProvider, BadValueCast, Complete, EntityId, EntityNotFound, EntitySchema, EntityType,
    EntityTypeChanged, EntityTypeNotFound, FieldNotFound, FieldNotInheritable, FieldOverride,
    FieldSchema, FieldType, InheritableEntity, InheritanceNotSupported, JsonSnapshot, MapStore,
    OverrideState, Persistence, Record, Resolution, ResolutionFailed, SchemaRegistry, Single,
    Snowflake, StoreConfig, StoreTrait, Timestamp, Value, ValueTypeMismatch, epoch, now,
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Create a Value::Bool for direct use in field assignments
#[macro_export]
macro_rules! sbool {
    ($value:expr) => {
        $crate::Value::Bool($value)
    };
}

/// Create a Value::Int for direct use in field assignments
#[macro_export]
macro_rules! sint {
    ($value:expr) => {
        $crate::Value::Int($value)
    };
}

/// Create a Value::Float for direct use in field assignments
#[macro_export]
macro_rules! sfloat {
    ($value:expr) => {
        $crate::Value::Float($value)
    };
}

/// Create a Value::String for direct use in field assignments
///
/// # Example
///
/// ```
/// use qinherit_rs::sstr;
///
/// let city = sstr!("NY");
/// assert_eq!(city.as_string(), Some("NY"));
/// ```
#[macro_export]
macro_rules! sstr {
    ($value:expr) => {
        $crate::Value::String($value.to_string())
    };
}

/// Create a Value::EntityReference for direct use in field assignments
///
/// Accepts either an `EntityId` or an `Option<EntityId>`.
#[macro_export]
macro_rules! sref {
    ($value:expr) => {
        $crate::Value::EntityReference(::std::option::Option::<$crate::EntityId>::from($value))
    };
}

#[cfg(test)]
mod test;
