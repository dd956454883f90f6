//! Criterion benchmark for the full generation pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use delve::{generate_seeded, MapStyle, SizePreset, StockingConfig};

fn bench_generate(c: &mut Criterion) {
    let stocking = StockingConfig::default();

    c.bench_function("generate medium classic", |b| {
        b.iter(|| {
            generate_seeded(
                SizePreset::Medium,
                MapStyle::Classic,
                None,
                &stocking,
                black_box(42),
            )
            .expect("generation must succeed")
        })
    });

    c.bench_function("generate large cavern", |b| {
        b.iter(|| {
            generate_seeded(
                SizePreset::Large,
                MapStyle::Cavern,
                None,
                &stocking,
                black_box(7),
            )
            .expect("generation must succeed")
        })
    });
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
