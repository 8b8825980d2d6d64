//! Criterion benchmarks for the individual fairness scan.
//!
//! Compares the exact-vector blocked scan with the all-pairs scan on data
//! where a fraction of rows share clinical vectors.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fa_common::{CaseRecord, Dataset};
use fa_config::{ScanStrategy, ViolationConfig};
use fa_core::find_violations;

fn dataset(rows: usize) -> Dataset {
    let records = (0..rows as u64)
        .map(|i| {
            // Roughly every fourth row repeats an earlier vector.
            let key = if i % 4 == 0 { i / 8 } else { i };
            CaseRecord {
                case_id: i,
                requester_type: "GP".into(),
                premium_level: "Full".into(),
                symptom_severity: (key % 10) as f64 + 1.0,
                diagnostic_uncertainty: ((key * 37) % 100) as f64 / 100.0,
                time_sensitivity: ((key * 53) % 100) as f64 / 100.0,
                scope: (key % 5) as f64 + 1.0,
                persistence: ((key * 3) % 10) as f64 + 1.0,
                historical_alignment: ((key * 71) % 100) as f64 / 100.0,
                intervention_feasibility: ((key * 89) % 100) as f64 / 100.0,
                approved: u8::from(i % 3 != 0),
                ..Default::default()
            }
        })
        .collect();
    Dataset::new(records).expect("valid bench dataset")
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("violation_scan");
    group.sample_size(20);

    for rows in [200usize, 1_000, 2_000] {
        let ds = dataset(rows);
        for strategy in [ScanStrategy::Blocked, ScanStrategy::Exhaustive] {
            let config = ViolationConfig {
                strategy,
                ..Default::default()
            };
            group.bench_with_input(BenchmarkId::new(strategy.as_str(), rows), &ds, |b, ds| {
                b.iter(|| black_box(find_violations(ds, &config)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
