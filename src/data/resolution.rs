use rustc_hash::{FxHashMap, FxHashSet};

use crate::data::{EntitySchema, FieldType, Record, Value};

/// Outcome of resolving one entity against its ancestor chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Effective value of every inheritable field.
    pub values: FxHashMap<FieldType, Value>,
    pub inherited: FxHashSet<FieldType>,
    /// Own value each inherited field held before the ancestor value replaced it.
    pub own_empty_values: FxHashMap<FieldType, Value>,
    /// Nearest non-empty value strictly above the entity, overridden or not.
    pub ancestor_values: FxHashMap<FieldType, Value>,
}

/// Resolves the inheritable fields of `schema` given the entity's own values
/// and its ancestors ordered nearest first (the entity itself excluded).
///
/// For each inheritable field the own value wins when it is not empty.
/// Otherwise the first ancestor holding a non-empty value of the same kind
/// supplies it and the field is marked inherited. When nothing in the chain
/// has a value the field keeps its own empty value and is not inherited.
///
/// Emptiness is judged by the entity's own field schema, so `Int(0)` is a
/// real value unless the schema declares it a sentinel. Fields missing from
/// an ancestor record count as empty for that ancestor. The walk is bounded
/// by `ancestors.len()`.
pub fn resolve<T>(
    schema: &EntitySchema<T>,
    own_values: &FxHashMap<FieldType, Value>,
    ancestors: &[Record],
) -> Resolution {
    let mut resolution = Resolution::default();

    for field_type in schema.inheritable_fields() {
        let Some(field_schema) = schema.field(&field_type) else {
            continue;
        };

        let own_value = own_values
            .get(&field_type)
            .cloned()
            .unwrap_or_else(|| field_schema.default_value.clone());

        let ancestor_value = ancestors
            .iter()
            .filter_map(|record| record.get(&field_type))
            .find(|value| field_schema.accepts(value) && !field_schema.is_empty(value))
            .cloned();

        if !field_schema.is_empty(&own_value) {
            resolution.values.insert(field_type.clone(), own_value);
        } else if let Some(value) = &ancestor_value {
            log::trace!(
                "{}: field {} inherited as {:?}",
                schema.entity_type,
                field_type,
                value
            );
            resolution.values.insert(field_type.clone(), value.clone());
            resolution.inherited.insert(field_type.clone());
            resolution
                .own_empty_values
                .insert(field_type.clone(), own_value);
        } else {
            resolution.values.insert(field_type.clone(), own_value);
        }

        if let Some(value) = ancestor_value {
            resolution.ancestor_values.insert(field_type, value);
        }
    }

    resolution
}
