use rustc_hash::{FxHashMap, FxHashSet};

use crate::data::{Complete, EntitySchema, EntityType, Single, Value};
use crate::{EntityTypeNotFound, InheritanceNotSupported, Result};

/// Registered entity schemas plus their merged (complete) forms.
///
/// Registration is where misconfigured inheritance is caught: a type that
/// declares inheritable fields must also declare a reference field to walk
/// upward along.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: FxHashMap<EntityType, EntitySchema<Single>>,
    complete: FxHashMap<EntityType, EntitySchema<Complete>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entity_schema(&mut self, schema: EntitySchema<Single>) -> Result<()> {
        let entity_type = schema.entity_type.clone();
        let previous = self.schemas.insert(entity_type.clone(), schema);

        if let Err(e) = self.rebuild() {
            // Leave the registry as it was before the bad schema.
            match previous {
                Some(previous) => self.schemas.insert(entity_type, previous),
                None => self.schemas.remove(&entity_type),
            };
            self.rebuild()?;
            return Err(e);
        }

        log::debug!("Registered entity schema {}", entity_type);
        Ok(())
    }

    pub fn get_entity_schema(&self, entity_type: &EntityType) -> Result<&EntitySchema<Single>> {
        self.schemas
            .get(entity_type)
            .ok_or_else(|| EntityTypeNotFound(entity_type.clone()).into())
    }

    pub fn get_complete_entity_schema(
        &self,
        entity_type: &EntityType,
    ) -> Result<&EntitySchema<Complete>> {
        self.complete
            .get(entity_type)
            .ok_or_else(|| EntityTypeNotFound(entity_type.clone()).into())
    }

    fn rebuild(&mut self) -> Result<()> {
        let mut complete = FxHashMap::default();
        for entity_type in self.schemas.keys() {
            let schema = self.merge(entity_type)?;
            validate_inheritance(&schema)?;
            complete.insert(entity_type.clone(), schema);
        }
        self.complete = complete;
        Ok(())
    }

    /// Merges base type fields into the schema, nearest declaration wins.
    fn merge(&self, entity_type: &EntityType) -> Result<EntitySchema<Complete>> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(entity_type.clone());

        while let Some(et) = current {
            if !seen.insert(et.clone()) {
                return Err(InheritanceNotSupported::new(
                    entity_type,
                    format!("circular base type chain through {}", et),
                )
                .into());
            }

            let schema = self
                .schemas
                .get(&et)
                .ok_or_else(|| EntityTypeNotFound(et.clone()))?;
            current = schema.inherit.clone();
            chain.push(schema);
        }

        let mut merged = EntitySchema::<Single>::new(entity_type.clone(), None);
        // Walk from the farthest base down so derived declarations override.
        for schema in chain.iter().rev() {
            for (field_type, field_schema) in schema.fields.iter() {
                merged.fields.insert(field_type.clone(), field_schema.clone());
            }
            if schema.parent_field.is_some() {
                merged.parent_field = schema.parent_field.clone();
            }
        }
        merged.inherit = chain.first().and_then(|schema| schema.inherit.clone());

        Ok(merged.into_complete())
    }
}

fn validate_inheritance(schema: &EntitySchema<Complete>) -> Result<()> {
    let inheritable = schema.inheritable_fields();
    if inheritable.is_empty() {
        return Ok(());
    }

    let parent_field = schema.parent_field.as_ref().ok_or_else(|| {
        InheritanceNotSupported::new(&schema.entity_type, "no parent field is declared")
    })?;

    let parent_schema = schema.field(parent_field).ok_or_else(|| {
        InheritanceNotSupported::new(
            &schema.entity_type,
            format!("parent field {} is not a field of the type", parent_field),
        )
    })?;

    if !parent_schema.accepts(&Value::EntityReference(None)) {
        return Err(InheritanceNotSupported::new(
            &schema.entity_type,
            format!("parent field {} is not an entity reference", parent_field),
        )
        .into());
    }

    if parent_schema.inheritable {
        return Err(InheritanceNotSupported::new(
            &schema.entity_type,
            format!("parent field {} cannot itself be inheritable", parent_field),
        )
        .into());
    }

    Ok(())
}
