use itertools::Itertools;

use crate::data::{FieldType, InheritableEntity, Record, StoreTrait};
use crate::Result;

/// Inherited fields the caller has not touched since the last resolution.
///
/// These are reset to their empty sentinel before writing, so the stored
/// record never carries a value copied down from an ancestor.
pub fn fields_to_empty(entity: &InheritableEntity) -> Vec<FieldType> {
    let dirty = entity.dirty_fields();
    entity
        .inherited
        .iter()
        .filter(|field_type| !dirty.contains(*field_type))
        .cloned()
        .sorted()
        .collect()
}

/// The record to persist: current values with `to_empty` reset.
fn staged_record(entity: &InheritableEntity, to_empty: &[FieldType]) -> Record {
    let mut record = entity.as_record();
    for field_type in to_empty {
        if let Some(field_schema) = entity.schema.field(field_type) {
            record
                .fields
                .insert(field_type.clone(), field_schema.empty_value().clone());
        }
    }
    record
}

/// Saves the entity with exactly one write, then re-resolves it in memory.
///
/// Untouched inherited fields are emptied in the written record only; if the
/// write fails the entity is left exactly as it was and the error is returned
/// unchanged.
pub fn save<S>(entity: &mut InheritableEntity, store: &mut S) -> Result<Record>
where
    S: StoreTrait + ?Sized,
{
    let to_empty = fields_to_empty(entity);
    let staged = staged_record(entity, &to_empty);

    let written = store.write(&staged)?;
    log::debug!(
        "Saved {} {:?}, emptied inherited fields {:?}",
        written.entity_type,
        written.entity_id,
        to_empty
    );

    entity.load_record(&written);
    entity.refresh(&*store)?;

    Ok(written)
}
