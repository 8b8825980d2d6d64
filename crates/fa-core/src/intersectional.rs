//! Intersectional analysis over combinations of boolean attributes.

use fa_common::{BoolAttribute, Dataset, Result};
use fa_config::validate::validate_intersectional_config;
use fa_config::IntersectionalConfig;
use serde::{Deserialize, Serialize, Serializer};

/// A conjunction of boolean attributes, e.g. `premium_limited & requester_gp`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Intersection(pub Vec<BoolAttribute>);

impl Intersection {
    pub fn new(attributes: impl Into<Vec<BoolAttribute>>) -> Self {
        Self(attributes.into())
    }

    pub fn attributes(&self) -> &[BoolAttribute] {
        &self.0
    }
}

impl std::fmt::Display for Intersection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, attribute) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" & ")?;
            }
            f.write_str(attribute.as_str())?;
        }
        Ok(())
    }
}

// Serialized as its display string so reports can key JSON maps by it.
impl Serialize for Intersection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Statistics of the rows where every attribute of an intersection holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgroupStats {
    pub approval_rate: f64,
    pub mean_processing_minutes: f64,
    pub sample_size: usize,
}

/// Included subgroups in configured order, plus those gated out for size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntersectionalReport {
    pub min_sample_size: usize,
    /// Serialized as a map keyed by the intersection string.
    #[serde(serialize_with = "serialize_subgroups")]
    pub subgroups: Vec<(Intersection, SubgroupStats)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub omitted: Vec<Intersection>,
}

impl IntersectionalReport {
    pub fn get(&self, attributes: &[BoolAttribute]) -> Option<&SubgroupStats> {
        self.subgroups
            .iter()
            .find(|(intersection, _)| intersection.attributes() == attributes)
            .map(|(_, stats)| stats)
    }

    pub fn len(&self) -> usize {
        self.subgroups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subgroups.is_empty()
    }
}

fn serialize_subgroups<S: Serializer>(
    subgroups: &[(Intersection, SubgroupStats)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(subgroups.iter().map(|(intersection, stats)| (intersection, stats)))
}

/// Evaluate each configured combination; report it only when strictly more
/// than `min_sample_size` rows match.
pub fn intersectional_analysis(
    dataset: &Dataset,
    config: &IntersectionalConfig,
) -> Result<IntersectionalReport> {
    validate_intersectional_config(config)?;

    let mut report = IntersectionalReport {
        min_sample_size: config.min_sample_size,
        ..Default::default()
    };

    for combination in &config.combinations {
        let intersection = Intersection::new(combination.as_slice());

        let mut sample_size = 0usize;
        let mut approvals = 0usize;
        let mut minutes = 0.0;
        for record in dataset
            .iter()
            .filter(|r| combination.iter().all(|attr| attr.value(r)))
        {
            sample_size += 1;
            approvals += usize::from(record.approved);
            minutes += record.processing_minutes;
        }

        if sample_size <= config.min_sample_size {
            tracing::trace!(
                intersection = %intersection,
                sample_size,
                "intersection below minimum sample size"
            );
            report.omitted.push(intersection);
            continue;
        }

        let n = sample_size as f64;
        report.subgroups.push((
            intersection,
            SubgroupStats {
                approval_rate: approvals as f64 / n,
                mean_processing_minutes: minutes / n,
                sample_size,
            },
        ));
    }

    tracing::debug!(
        included = report.subgroups.len(),
        omitted = report.omitted.len(),
        "intersectional analysis complete"
    );
    Ok(report)
}
