//! Fuzz target for dataset files.
//!
//! Datasets come from outside the process: duplicate ids, non-binary
//! outcomes, and non-finite values must surface as errors. Anything that
//! loads must then audit without panicking.

#![no_main]

use fa_common::Dataset;
use fa_core::{group_fairness, intersectional_analysis, GroupLabels, IntersectionalConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(dataset) = Dataset::from_json_str(text) else {
        return;
    };
    if let Ok(report) = group_fairness(&dataset, &GroupLabels::default()) {
        assert!((0.0..=1.0).contains(&report.statistical_parity.difference));
    }
    let _ = intersectional_analysis(&dataset, &IntersectionalConfig::default());
});
