//! Fuzz target for the individual fairness scan.
//!
//! The blocked scan must report exactly the pairs the exhaustive scan does.

#![no_main]

use arbitrary::Arbitrary;
use fa_common::{CaseRecord, Dataset};
use fa_core::{find_violations, ScanStrategy, ViolationConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Row {
    /// Small feature alphabet so identical vectors are common.
    features: [u8; 7],
    approved: bool,
}

#[derive(Debug, Arbitrary)]
struct Input {
    rows: Vec<Row>,
    bound: u8,
}

fuzz_target!(|input: Input| {
    let records: Vec<CaseRecord> = input
        .rows
        .iter()
        .take(256)
        .enumerate()
        .map(|(i, row)| {
            let f = row.features.map(|v| f64::from(v % 3));
            CaseRecord {
                case_id: i as u64,
                requester_type: "GP".into(),
                premium_level: "Full".into(),
                symptom_severity: f[0],
                diagnostic_uncertainty: f[1],
                time_sensitivity: f[2],
                scope: f[3],
                persistence: f[4],
                historical_alignment: f[5],
                intervention_feasibility: f[6],
                approved: u8::from(row.approved),
                ..Default::default()
            }
        })
        .collect();
    let Ok(dataset) = Dataset::new(records) else {
        return;
    };

    let bound = f64::from(input.bound) / 255.0;
    let scan = |strategy| {
        find_violations(
            &dataset,
            &ViolationConfig {
                similarity_bound: bound,
                strategy,
                ..Default::default()
            },
        )
    };
    if let (Ok(blocked), Ok(exhaustive)) = (scan(ScanStrategy::Blocked), scan(ScanStrategy::Exhaustive)) {
        assert_eq!(blocked, exhaustive);
    }
});
