mod store;

use crate::data::ft;
use crate::*;

pub(crate) const COMPANY: &str = "Company";
pub(crate) const NON_FOR_PROFIT: &str = "NonForProfit";

pub(crate) fn city() -> FieldType {
    FieldType::from("City")
}

pub(crate) fn address() -> FieldType {
    FieldType::from("Address")
}

pub(crate) fn employees() -> FieldType {
    FieldType::from("Employees")
}

pub(crate) fn description() -> FieldType {
    FieldType::from("Description")
}

pub(crate) fn company_schema() -> EntitySchema<Single> {
    EntitySchema::hierarchical(COMPANY, None)
        .with_field(FieldSchema::string("Address", 2).inheritable())
        .with_field(FieldSchema::string("City", 3).inheritable())
        .with_field(FieldSchema::string("Country", 4).inheritable())
        .with_field(FieldSchema::entity_reference("Ceo", 5).inheritable())
        .with_field(FieldSchema::int("Employees", 6).inheritable())
        .with_field(FieldSchema::string("Description", 7))
}

pub(crate) fn ratio() -> FieldType {
    FieldType::from("Ratio")
}

/// A store with a single hierarchical "Gauge" type holding one inheritable
/// float field.
pub(crate) fn gauge_store(ratio_schema: FieldSchema) -> Result<MapStore> {
    let mut store = MapStore::with_config(StoreConfig::default());
    store.set_entity_schema(EntitySchema::hierarchical("Gauge", None).with_field(ratio_schema))?;
    Ok(store)
}

pub(crate) fn gauge<S: StoreTrait + ?Sized>(
    store: &mut S,
    parent: Option<EntityId>,
    ratio_value: Option<f64>,
) -> Result<InheritableEntity> {
    let mut values = vec![(ft::parent(), sref!(parent))];
    if let Some(ratio_value) = ratio_value {
        values.push((ratio(), sfloat!(ratio_value)));
    }
    create_entity(store, &EntityType::from("Gauge"), values)
}

pub(crate) fn setup_store() -> Result<MapStore> {
    let mut store = MapStore::with_config(StoreConfig::default());
    store.set_entity_schema(company_schema())?;
    store.set_entity_schema(
        EntitySchema::new(NON_FOR_PROFIT, Some(EntityType::from(COMPANY)))
            .with_field(FieldSchema::string("Notes", 10)),
    )?;
    Ok(store)
}

/// Creates and saves a company with the given parent and city.
pub(crate) fn company<S: StoreTrait + ?Sized>(
    store: &mut S,
    name: &str,
    parent: Option<EntityId>,
    city_value: &str,
) -> Result<InheritableEntity> {
    create_entity(
        store,
        &EntityType::from(COMPANY),
        vec![
            (ft::name(), sstr!(name)),
            (ft::parent(), sref!(parent)),
            (city(), sstr!(city_value)),
        ],
    )
}

pub(crate) fn id_of(entity: &InheritableEntity) -> Result<EntityId> {
    entity
        .entity_id()
        .ok_or_else(|| "entity has not been saved".into())
}

#[derive(Debug)]
pub(crate) struct StorageUnavailable;

impl std::error::Error for StorageUnavailable {}

impl std::fmt::Display for StorageUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage unavailable")
    }
}

/// Wraps a MapStore to count writes and inject failures.
pub(crate) struct FlakyStore {
    pub inner: MapStore,
    pub fail_ancestors: bool,
    pub fail_writes: bool,
    pub writes: usize,
}

impl FlakyStore {
    pub fn new(inner: MapStore) -> Self {
        FlakyStore {
            inner,
            fail_ancestors: false,
            fail_writes: false,
            writes: 0,
        }
    }
}

impl AncestorProvider for FlakyStore {
    fn ancestors_of(&self, entity_id: EntityId, include_self: bool) -> Result<Vec<Record>> {
        if self.fail_ancestors {
            return Err(StorageUnavailable.into());
        }
        self.inner.ancestors_of(entity_id, include_self)
    }

    fn children_of(&self, entity_id: EntityId) -> Result<Vec<EntityId>> {
        self.inner.children_of(entity_id)
    }
}

impl Persistence for FlakyStore {
    fn load(&self, entity_id: EntityId) -> Result<Record> {
        self.inner.load(entity_id)
    }

    fn write(&mut self, record: &Record) -> Result<Record> {
        if self.fail_writes {
            return Err(StorageUnavailable.into());
        }
        self.writes += 1;
        self.inner.write(record)
    }
}

impl StoreTrait for FlakyStore {
    fn get_complete_entity_schema(&self, entity_type: &EntityType) -> Result<&EntitySchema<Complete>> {
        self.inner.get_complete_entity_schema(entity_type)
    }
}
