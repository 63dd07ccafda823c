use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qinherit_rs::data::ft;
use qinherit_rs::*;

fn company_schema() -> EntitySchema<Single> {
    EntitySchema::hierarchical("Company", None)
        .with_field(FieldSchema::string("Address", 2).inheritable())
        .with_field(FieldSchema::string("City", 3).inheritable())
        .with_field(FieldSchema::string("Country", 4).inheritable())
        .with_field(FieldSchema::int("Employees", 5).inheritable())
}

// Builds a chain of `depth` companies below a root that holds every value.
fn build_chain(depth: usize) -> Result<(MapStore, EntityId)> {
    let mut store = MapStore::with_config(StoreConfig::default().with_max_ancestor_depth(depth + 1));
    store.set_entity_schema(company_schema())?;

    let et_company = EntityType::from("Company");
    let root = create_entity(
        &mut store,
        &et_company,
        vec![
            (ft::name(), sstr!("root")),
            (FieldType::from("Address"), sstr!("Main st.")),
            (FieldType::from("City"), sstr!("NY")),
            (FieldType::from("Country"), sstr!("US")),
        ],
    )?;

    let mut parent = root.entity_id().ok_or("root not saved")?;
    for i in 0..depth {
        let node = create_entity(
            &mut store,
            &et_company,
            vec![
                (ft::name(), sstr!(format!("level {}", i))),
                (ft::parent(), sref!(parent)),
            ],
        )?;
        parent = node.entity_id().ok_or("node not saved")?;
    }

    Ok((store, parent))
}

fn bench_load_and_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_and_resolve");

    for depth in [1, 10, 100, 500].iter() {
        let (store, leaf) = build_chain(*depth).unwrap();
        group.throughput(Throughput::Elements(*depth as u64));

        group.bench_with_input(BenchmarkId::new("depth", depth), depth, |b, _| {
            b.iter(|| {
                let entity = load_entity(&store, black_box(leaf)).unwrap();
                black_box(entity.resolved_value(&FieldType::from("City")).cloned());
            });
        });
    }

    group.finish();
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");

    for depth in [1, 10, 100].iter() {
        let (mut store, leaf) = build_chain(*depth).unwrap();

        group.bench_with_input(BenchmarkId::new("depth", depth), depth, |b, _| {
            b.iter(|| {
                let mut entity = load_entity(&store, leaf).unwrap();
                black_box(save(&mut entity, &mut store).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load_and_resolve, bench_save);
criterion_main!(benches);
