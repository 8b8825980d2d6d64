//! Criterion benchmarks for bootstrap confidence intervals.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fa_common::{CaseRecord, Dataset};
use fa_config::BootstrapConfig;
use fa_core::{bootstrap_ci, StatisticalParity};

fn dataset(rows: usize) -> Dataset {
    let records = (0..rows as u64)
        .map(|i| CaseRecord {
            case_id: i,
            requester_type: if i % 4 == 0 { "Surgeon" } else { "GP" }.into(),
            premium_level: "Full".into(),
            approved: u8::from((i * 7) % 10 < 6),
            ..Default::default()
        })
        .collect();
    Dataset::new(records).expect("valid bench dataset")
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap_ci");
    group.sample_size(10);

    let metric = StatisticalParity::default();
    let columns = StatisticalParity::columns();
    for rows in [500usize, 2_000] {
        let ds = dataset(rows);
        let config = BootstrapConfig::default().with_iterations(1_000).with_seed(1);
        group.bench_with_input(BenchmarkId::new("statistical_parity", rows), &ds, |b, ds| {
            b.iter(|| black_box(bootstrap_ci(ds, &metric, &columns, &config)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bootstrap);
criterion_main!(benches);
