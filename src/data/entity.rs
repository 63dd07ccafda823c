use rustc_hash::{FxHashMap, FxHashSet};

use crate::data::{
    resolve, AncestorProvider, Complete, EntityId, EntitySchema, EntityType, FieldType, Record,
    Resolution, StoreTrait, Value,
};
use crate::{save, ResolutionFailed, Result};

/// An entity whose inheritable fields are resolved against its ancestors.
///
/// `fields` always holds the effective values. For inherited fields the
/// entity's own (empty) value is kept aside in `own_empty_values` so it can be
/// restored, and `baseline` is the snapshot taken at the last resolution that
/// dirty detection compares against.
#[derive(Debug, Clone)]
pub struct InheritableEntity {
    pub(crate) schema: EntitySchema<Complete>,
    pub(crate) entity_id: Option<EntityId>,
    pub(crate) fields: FxHashMap<FieldType, Value>,
    pub(crate) inherited: FxHashSet<FieldType>,
    pub(crate) own_empty_values: FxHashMap<FieldType, Value>,
    pub(crate) ancestor_values: FxHashMap<FieldType, Value>,
    pub(crate) baseline: FxHashMap<FieldType, Value>,
    pub(crate) resolved: bool,
}

impl InheritableEntity {
    /// A fresh, unsaved and unresolved entity with every field at its default.
    pub fn new(schema: &EntitySchema<Complete>) -> Self {
        let fields = schema
            .fields
            .values()
            .map(|field| (field.field_type.clone(), field.default_value.clone()))
            .collect();

        InheritableEntity {
            schema: schema.clone(),
            entity_id: None,
            fields,
            inherited: FxHashSet::default(),
            own_empty_values: FxHashMap::default(),
            ancestor_values: FxHashMap::default(),
            baseline: FxHashMap::default(),
            resolved: false,
        }
    }

    /// An unresolved entity holding the values of a stored record.
    pub fn from_record(schema: &EntitySchema<Complete>, record: &Record) -> Self {
        let mut entity = Self::new(schema);
        entity.load_record(record);
        entity
    }

    /// Builds a fresh entity and resolves it without writing anything.
    pub fn construct<S, I, K>(store: &S, entity_type: &EntityType, values: I) -> Result<Self>
    where
        S: StoreTrait + ?Sized,
        I: IntoIterator<Item = (K, Value)>,
        K: Into<FieldType>,
    {
        let schema = store.get_complete_entity_schema(entity_type)?;
        let mut entity = Self::new(schema);
        for (field_type, value) in values {
            entity.set_value(field_type, value);
        }
        entity.refresh(store)?;
        Ok(entity)
    }

    pub fn with_value(mut self, field_type: impl Into<FieldType>, value: Value) -> Self {
        self.set_value(field_type, value);
        self
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        self.entity_id
    }

    pub fn entity_type(&self) -> &EntityType {
        &self.schema.entity_type
    }

    pub fn schema(&self) -> &EntitySchema<Complete> {
        &self.schema
    }

    pub fn declared_inheritable_fields(&self) -> Vec<FieldType> {
        self.schema.inheritable_fields()
    }

    /// The in-memory value, whether resolved or not.
    pub fn value(&self, field_type: &FieldType) -> Option<&Value> {
        self.fields.get(field_type)
    }

    pub fn set_value(&mut self, field_type: impl Into<FieldType>, value: Value) {
        self.fields.insert(field_type.into(), value);
    }

    /// Effective value of a field, `None` while the entity is unresolved.
    pub fn resolved_value(&self, field_type: &FieldType) -> Option<&Value> {
        if self.resolved {
            self.fields.get(field_type)
        } else {
            None
        }
    }

    pub fn is_inherited(&self, field_type: &FieldType) -> bool {
        self.inherited.contains(field_type)
    }

    pub fn inherited_fields(&self) -> &FxHashSet<FieldType> {
        &self.inherited
    }

    pub fn own_empty_value(&self, field_type: &FieldType) -> Option<&Value> {
        self.own_empty_values.get(field_type)
    }

    /// Nearest ancestor value of a field, shown in place of an empty input.
    pub fn placeholder(&self, field_type: &FieldType) -> Option<&Value> {
        self.ancestor_values.get(field_type)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn parent(&self) -> Option<EntityId> {
        let parent_field = self.schema.parent_field.as_ref()?;
        match self.fields.get(parent_field) {
            Some(Value::EntityReference(reference)) => *reference,
            _ => None,
        }
    }

    /// Re-parents the entity in memory. Takes effect on the next resolution.
    pub fn set_parent(&mut self, parent: Option<EntityId>) {
        if let Some(parent_field) = self.schema.parent_field.clone() {
            self.set_value(parent_field, Value::EntityReference(parent));
        }
    }

    /// Fields whose value differs from the snapshot taken at the last resolution.
    pub fn dirty_fields(&self) -> FxHashSet<FieldType> {
        let mut dirty: FxHashSet<FieldType> = self
            .fields
            .iter()
            .filter(|(field_type, value)| !matches_baseline(self.baseline.get(*field_type), value))
            .map(|(field_type, _)| field_type.clone())
            .collect();

        dirty.extend(
            self.baseline
                .keys()
                .filter(|field_type| !self.fields.contains_key(*field_type))
                .cloned(),
        );

        dirty
    }

    pub fn is_dirty(&self, field_type: &FieldType) -> bool {
        !is_untouched(&self.fields, &self.baseline, field_type)
    }

    /// Current in-memory values as a record, inherited values included.
    pub fn as_record(&self) -> Record {
        Record {
            entity_id: self.entity_id,
            entity_type: self.schema.entity_type.clone(),
            fields: self.fields.clone(),
            write_time: None,
        }
    }

    /// Resolves against an explicit ancestor chain, nearest first.
    pub fn resolve_with(&mut self, ancestors: &[Record]) {
        self.restore_own_values();
        let resolution = resolve(&self.schema, &self.fields, ancestors);
        self.apply(resolution);
    }

    /// Resolves against the chain the provider reports for the current parent.
    ///
    /// On failure the entity is left unresolved with its own values restored.
    pub fn refresh<P>(&mut self, provider: &P) -> Result<()>
    where
        P: AncestorProvider + ?Sized,
    {
        let ancestors = match self.parent() {
            Some(parent) => match provider.ancestors_of(parent, true) {
                Ok(ancestors) => ancestors,
                Err(e) => {
                    self.restore_own_values();
                    self.resolved = false;
                    return Err(ResolutionFailed {
                        entity_type: self.schema.entity_type.clone(),
                        entity_id: self.entity_id,
                        source: e,
                    }
                    .into());
                }
            },
            None => Vec::new(),
        };

        log::debug!(
            "Resolving {} {:?} against {} ancestor(s)",
            self.schema.entity_type,
            self.entity_id,
            ancestors.len()
        );
        self.resolve_with(&ancestors);
        Ok(())
    }

    /// Replaces in-memory state with a stored record; resolution state is dropped.
    pub(crate) fn load_record(&mut self, record: &Record) {
        self.entity_id = record.entity_id;
        for (field_type, value) in record.fields.iter() {
            self.fields.insert(field_type.clone(), value.clone());
        }
        self.inherited.clear();
        self.own_empty_values.clear();
        self.ancestor_values.clear();
        self.baseline.clear();
        self.resolved = false;
    }

    /// Undoes the last resolution for fields the caller has not touched since.
    fn restore_own_values(&mut self) {
        for field_type in self.inherited.drain() {
            let untouched = is_untouched(&self.fields, &self.baseline, &field_type);
            if let Some(own) = self.own_empty_values.remove(&field_type) {
                if untouched {
                    self.fields.insert(field_type, own);
                }
            }
        }
        self.own_empty_values.clear();
        self.ancestor_values.clear();
    }

    fn apply(&mut self, resolution: Resolution) {
        for (field_type, value) in resolution.values {
            self.fields.insert(field_type, value);
        }
        self.inherited = resolution.inherited;
        self.own_empty_values = resolution.own_empty_values;
        self.ancestor_values = resolution.ancestor_values;
        self.baseline = self.fields.clone();
        self.resolved = true;
    }
}

fn matches_baseline(baseline: Option<&Value>, value: &Value) -> bool {
    baseline.is_some_and(|baseline| baseline.same_value(value))
}

fn is_untouched(
    fields: &FxHashMap<FieldType, Value>,
    baseline: &FxHashMap<FieldType, Value>,
    field_type: &FieldType,
) -> bool {
    match fields.get(field_type) {
        Some(value) => matches_baseline(baseline.get(field_type), value),
        None => !baseline.contains_key(field_type),
    }
}

/// Loads a stored entity and resolves it against its current ancestors.
pub fn load_entity<S>(store: &S, entity_id: EntityId) -> Result<InheritableEntity>
where
    S: StoreTrait + ?Sized,
{
    let record = store.load(entity_id)?;
    let schema = store.get_complete_entity_schema(&record.entity_type)?;
    let mut entity = InheritableEntity::from_record(schema, &record);
    entity.refresh(store)?;
    Ok(entity)
}

/// Constructs, resolves and saves a new entity.
pub fn create_entity<S, I, K>(
    store: &mut S,
    entity_type: &EntityType,
    values: I,
) -> Result<InheritableEntity>
where
    S: StoreTrait + ?Sized,
    I: IntoIterator<Item = (K, Value)>,
    K: Into<FieldType>,
{
    let mut entity = InheritableEntity::construct(&*store, entity_type, values)?;
    save(&mut entity, store)?;
    Ok(entity)
}

/// Loads and resolves `root` and all of its descendants, parents first.
pub fn resolve_subtree<S>(store: &S, root: EntityId) -> Result<Vec<InheritableEntity>>
where
    S: StoreTrait + ?Sized,
{
    let mut ids = vec![root];
    ids.extend(store.descendants_of(root)?);

    ids.into_iter()
        .map(|entity_id| load_entity(store, entity_id))
        .collect()
}
