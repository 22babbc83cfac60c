use criterion::{black_box, criterion_group, criterion_main, Criterion};

use zpgen::{ClassExpression, Composer, Composition, Entity, EntityTerm, IdStore, PhenotypeEntry};

fn entries(times: u32) -> Vec<PhenotypeEntry> {
    (0..times)
        .map(|n| {
            let entity2 = (n % 3 == 0).then(|| {
                Entity::new(EntityTerm::new("ZFA:0000107", "eye"), None)
            });
            PhenotypeEntry::new(
                "ZDB-GENE-1",
                Entity::new(
                    EntityTerm::new(&format!("ZFA:{:07}", n % 500), "entity"),
                    Some(EntityTerm::new(&format!("GO:{:07}", n % 7), "part")),
                ),
                entity2,
                EntityTerm::new(&format!("PATO:{:07}", n % 50), "quality"),
                true,
            )
        })
        .collect()
}

fn expressions(times: u32) -> Vec<ClassExpression> {
    let composer = Composer::default();
    entries(times)
        .iter()
        .filter_map(|entry| match composer.compose(entry) {
            Ok(Composition::Composed(composed)) => Some(composed.expression),
            _ => None,
        })
        .collect()
}

fn fingerprint_benchmark(c: &mut Criterion) {
    let expressions = expressions(10_000);

    c.bench_function("fingerprint 10000", |b| {
        b.iter(|| {
            for expr in &expressions {
                black_box(expr.fingerprint());
            }
        })
    });
}

fn identify_benchmark(c: &mut Criterion) {
    let composer = Composer::default();
    let entries = entries(10_000);

    c.bench_function("compose-identify 10000", |b| {
        b.iter(|| {
            let mut store = IdStore::new();
            for entry in &entries {
                if let Ok(Composition::Composed(composed)) = composer.compose(black_box(entry)) {
                    store.identify(&composed.expression, &composed.label).unwrap();
                }
            }
            store.len()
        })
    });
}

criterion_group!(fingerprint, fingerprint_benchmark, identify_benchmark);
criterion_main!(fingerprint);
