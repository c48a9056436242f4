use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use confcarrier::{Configuration, ConfigurationCarrier};

fn configuration_with(entries: usize) -> Configuration {
    (0..entries)
        .map(|i| (format!("bench.key.{i}"), format!("value-{i}")))
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("carrier_encode");

    for entries in [16, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("cached", entries), &entries, |b, &n| {
            let mut carrier = ConfigurationCarrier::new(configuration_with(n));
            let mut out = Vec::new();
            b.iter(|| {
                out.clear();
                carrier.encode(&mut out).unwrap();
                black_box(out.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("invalidated", entries), &entries, |b, &n| {
            let mut carrier = ConfigurationCarrier::new(configuration_with(n));
            let mut out = Vec::new();
            b.iter(|| {
                let _ = carrier.get_config();
                out.clear();
                carrier.encode(&mut out).unwrap();
                black_box(out.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
