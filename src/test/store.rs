use super::*;

#[test]
fn test_write_rejects_unknown_fields_and_types() -> Result<()> {
    let mut store = setup_store()?;

    let unknown_field = Record::new(COMPANY).with_value("Color", "red");
    let err = store.write(&unknown_field).err().ok_or("write should fail")?;
    assert!(err.downcast_ref::<FieldNotFound>().is_some());

    let unknown_type = Record::new("Nothing");
    let err = store.write(&unknown_type).err().ok_or("write should fail")?;
    assert!(err.downcast_ref::<EntityTypeNotFound>().is_some());

    let mismatch = Record::new(COMPANY).with_value("Employees", "many");
    let err = store.write(&mismatch).err().ok_or("write should fail")?;
    assert!(err.downcast_ref::<ValueTypeMismatch>().is_some());

    assert!(store.is_empty());

    Ok(())
}

#[test]
fn test_write_rejects_missing_parent_and_unknown_id() -> Result<()> {
    let mut store = setup_store()?;

    let orphan = Record::new(COMPANY).with_value(ft::PARENT, Some(EntityId::new(42)));
    let err = store.write(&orphan).err().ok_or("write should fail")?;
    assert!(err.downcast_ref::<EntityNotFound>().is_some());

    let mut ghost = Record::new(COMPANY);
    ghost.entity_id = Some(EntityId::new(7));
    let err = store.write(&ghost).err().ok_or("write should fail")?;
    assert!(err.downcast_ref::<EntityNotFound>().is_some());

    Ok(())
}

#[test]
fn test_ancestors_are_nearest_first() -> Result<()> {
    let mut store = setup_store()?;
    let root = company(&mut store, "root", None, "")?;
    let middle = company(&mut store, "middle", Some(id_of(&root)?), "")?;
    let leaf = company(&mut store, "leaf", Some(id_of(&middle)?), "")?;

    let names = |records: Vec<Record>| -> Vec<Value> {
        records
            .into_iter()
            .filter_map(|record| record.get(&ft::name()).cloned())
            .collect()
    };

    let with_self = store.ancestors_of(id_of(&leaf)?, true)?;
    assert_eq!(names(with_self), vec![sstr!("leaf"), sstr!("middle"), sstr!("root")]);

    let without_self = store.ancestors_of(id_of(&leaf)?, false)?;
    assert_eq!(names(without_self), vec![sstr!("middle"), sstr!("root")]);

    assert!(store.ancestors_of(id_of(&root)?, false)?.is_empty());

    Ok(())
}

#[test]
fn test_ancestor_depth_is_bounded() -> Result<()> {
    let mut store = MapStore::with_config(StoreConfig::default().with_max_ancestor_depth(2));
    store.set_entity_schema(company_schema())?;

    let root = company(&mut store, "root", None, "NY")?;
    let mut parent = id_of(&root)?;
    for depth in 1..=4 {
        parent = id_of(&company(&mut store, &format!("level {}", depth), Some(parent), "")?)?;
    }

    // The bound counts ancestors only, not the starting record.
    assert_eq!(store.ancestors_of(parent, false)?.len(), 2);
    assert_eq!(store.ancestors_of(parent, true)?.len(), 3);

    // The root lies beyond the bound, so nothing is inherited.
    let deepest = load_entity(&store, parent)?;
    assert!(!deepest.is_inherited(&city()));

    Ok(())
}

#[test]
fn test_write_cannot_change_entity_type() -> Result<()> {
    let mut store = setup_store()?;
    let entity = company(&mut store, "company", None, "NY")?;

    let mut record = store.load(id_of(&entity)?)?;
    record.entity_type = EntityType::from(NON_FOR_PROFIT);

    let err = match store.write(&record) {
        Ok(_) => panic!("Expected EntityTypeChanged"),
        Err(e) => e,
    };
    assert!(err.downcast_ref::<EntityTypeChanged>().is_some());
    assert_eq!(store.load(id_of(&entity)?)?.entity_type, EntityType::from(COMPANY));

    Ok(())
}

#[test]
fn test_descendants_come_after_their_parents() -> Result<()> {
    let mut store = setup_store()?;
    let root = company(&mut store, "root", None, "NY")?;
    let a = company(&mut store, "a", Some(id_of(&root)?), "")?;
    let b = company(&mut store, "b", Some(id_of(&a)?), "")?;
    let c = company(&mut store, "c", Some(id_of(&root)?), "LA")?;
    let d = company(&mut store, "d", Some(id_of(&c)?), "")?;

    let descendants = store.descendants_of(id_of(&root)?)?;
    assert_eq!(descendants.len(), 4);

    let position = |entity: &InheritableEntity| -> Result<usize> {
        let id = id_of(entity)?;
        descendants
            .iter()
            .position(|candidate| *candidate == id)
            .ok_or_else(|| "missing descendant".into())
    };
    assert!(position(&a)? < position(&b)?);
    assert!(position(&c)? < position(&d)?);

    assert_eq!(store.children_of(id_of(&root)?)?, vec![id_of(&a)?, id_of(&c)?]);

    Ok(())
}

#[test]
fn test_resolve_subtree() -> Result<()> {
    let mut store = setup_store()?;
    let root = company(&mut store, "root", None, "NY")?;
    let a = company(&mut store, "a", Some(id_of(&root)?), "")?;
    company(&mut store, "b", Some(id_of(&a)?), "")?;
    company(&mut store, "c", Some(id_of(&root)?), "LA")?;

    let subtree = resolve_subtree(&store, id_of(&a)?)?;
    assert_eq!(subtree.len(), 2);
    for entity in subtree.iter() {
        assert_eq!(entity.resolved_value(&city()), Some(&sstr!("NY")));
        assert!(entity.is_inherited(&city()));
    }

    let everything = resolve_subtree(&store, id_of(&root)?)?;
    assert_eq!(everything.len(), 4);
    assert!(everything.iter().all(|entity| entity.is_resolved()));

    Ok(())
}

#[test]
fn test_children_of_unknown_entity() -> Result<()> {
    let store = setup_store()?;
    assert!(store.children_of(EntityId::new(1)).is_err());
    assert!(store.ancestors_of(EntityId::new(1), true).is_err());

    Ok(())
}
