//! Synthetic case generator with an injected requester bias.
//!
//! Surgeons receive a flat +0.10 approval probability over GPs with the same
//! clinical necessity, and Limited-tier cases take longer to process. Audits
//! over generated data should therefore report a requester disparity.

use fa_common::{
    CaseRecord, Dataset, Result, PREMIUM_FULL, PREMIUM_LIMITED, REQUESTER_GP, REQUESTER_SURGEON,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Share of requests coming from GPs.
const GP_SHARE: f64 = 0.75;
/// Share of requests on the Limited tier.
const LIMITED_SHARE: f64 = 0.4;
/// Share of rural requests.
const RURAL_SHARE: f64 = 0.3;
/// A case is clinically necessary when a uniform draw exceeds this.
const NECESSITY_CUTOFF: f64 = 0.4;

const APPROVAL_IF_NECESSARY: f64 = 0.85;
const APPROVAL_IF_UNNECESSARY: f64 = 0.4;
const SURGEON_BONUS: f64 = 0.10;

/// Weighted composite of the clinical features.
pub fn priority_score(record: &CaseRecord) -> f64 {
    0.3 * record.symptom_severity
        + 0.2 * record.scope
        + 0.2 * record.persistence
        + 0.2 * record.historical_alignment
        + 0.1 * record.intervention_feasibility
}

/// Probability that a case is approved.
pub fn approval_probability(clinical_necessity: bool, requester_type: &str) -> f64 {
    let base = if clinical_necessity {
        APPROVAL_IF_NECESSARY
    } else {
        APPROVAL_IF_UNNECESSARY
    };
    if requester_type == REQUESTER_SURGEON {
        base + SURGEON_BONUS
    } else {
        base
    }
}

/// Generate `n` cases with ids `0..n` from a seeded generator.
pub fn generate_fairness_data(n: usize, seed: u64) -> Result<Dataset> {
    let mut rng = StdRng::seed_from_u64(seed);
    let records = (0..n as u64).map(|id| generate_case(&mut rng, id)).collect();
    let dataset = Dataset::new(records)?;
    tracing::debug!(rows = n, seed, "synthetic dataset generated");
    Ok(dataset)
}

fn generate_case<R: Rng>(rng: &mut R, case_id: u64) -> CaseRecord {
    let requester_type = if rng.random_bool(GP_SHARE) {
        REQUESTER_GP
    } else {
        REQUESTER_SURGEON
    };
    let limited = rng.random_bool(LIMITED_SHARE);
    let premium_level = if limited { PREMIUM_LIMITED } else { PREMIUM_FULL };

    let mut record = CaseRecord {
        case_id,
        requester_type: requester_type.to_string(),
        premium_level: premium_level.to_string(),
        location_rural: rng.random_bool(RURAL_SHARE),
        symptom_severity: f64::from(rng.random_range(1u8..=10)),
        diagnostic_uncertainty: rng.random(),
        time_sensitivity: rng.random(),
        scope: f64::from(rng.random_range(1u8..=5)),
        persistence: f64::from(rng.random_range(1u8..=10)),
        historical_alignment: rng.random(),
        intervention_feasibility: rng.random(),
        clinical_necessity: rng.random::<f64>() > NECESSITY_CUTOFF,
        ..Default::default()
    };
    record.priority_score = priority_score(&record);

    record.processing_minutes = if limited {
        f64::from(rng.random_range(13u8..18))
    } else {
        f64::from(rng.random_range(8u8..12))
    };

    let p = approval_probability(record.clinical_necessity, requester_type);
    record.approved = u8::from(p > rng.random::<f64>());
    record
}
