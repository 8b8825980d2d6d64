//! Chi-square test of approval independence between two groups.

use fa_common::{ColumnName, Dataset, Error, GroupPair, Result};
use fa_config::validate::validate_significance_config;
use fa_config::SignificanceConfig;
use fa_math::ContingencyTable;
use serde::{Deserialize, Serialize};

/// Significance test outcome. `effect_size` is Cramér's V, `sqrt(χ² / N)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub chi2_statistic: f64,
    pub p_value: f64,
    pub significant: bool,
    pub effect_size: f64,
}

impl SignificanceResult {
    /// Result reported when there is nothing to test.
    pub const NO_EFFECT: SignificanceResult = SignificanceResult {
        chi2_statistic: 0.0,
        p_value: 1.0,
        significant: false,
        effect_size: 0.0,
    };
}

/// Test with the default configuration (`alpha = 0.05`, Yates correction on).
pub fn significance_test(group1: &[u8], group2: &[u8]) -> Result<SignificanceResult> {
    significance_test_with(group1, group2, &SignificanceConfig::default())
}

/// Test whether approval is independent of group membership.
///
/// An empty group, or a table with a zero expected cell (no approvals or no
/// denials at all), yields [`SignificanceResult::NO_EFFECT`].
pub fn significance_test_with(
    group1: &[u8],
    group2: &[u8],
    config: &SignificanceConfig,
) -> Result<SignificanceResult> {
    validate_significance_config(config)?;
    let (approved1, denied1) = tally(group1)?;
    let (approved2, denied2) = tally(group2)?;

    if group1.is_empty() || group2.is_empty() {
        return Ok(SignificanceResult::NO_EFFECT);
    }

    let table = ContingencyTable::new([
        [approved1 as f64, denied1 as f64],
        [approved2 as f64, denied2 as f64],
    ]);
    let Some(test) = table.chi_square(config.yates) else {
        tracing::debug!(
            approved = approved1 + approved2,
            denied = denied1 + denied2,
            "degenerate contingency table"
        );
        return Ok(SignificanceResult::NO_EFFECT);
    };

    let n = (group1.len() + group2.len()) as f64;
    Ok(SignificanceResult {
        chi2_statistic: test.statistic,
        p_value: test.p_value,
        significant: test.p_value < config.alpha,
        effect_size: (test.statistic / n).sqrt(),
    })
}

fn tally(outcomes: &[u8]) -> Result<(usize, usize)> {
    let mut approved = 0;
    for (row, &value) in outcomes.iter().enumerate() {
        match value {
            0 => {}
            1 => approved += 1,
            _ => return Err(Error::InvalidOutcome { row, value }),
        }
    }
    Ok((approved, outcomes.len() - approved))
}

/// Split the dataset's outcomes by the two categories of `attribute` and test them.
pub fn compare_groups(
    dataset: &Dataset,
    attribute: ColumnName,
    pair: &GroupPair,
) -> Result<SignificanceResult> {
    compare_groups_with(dataset, attribute, pair, &SignificanceConfig::default())
}

/// [`compare_groups`] with an explicit configuration.
pub fn compare_groups_with(
    dataset: &Dataset,
    attribute: ColumnName,
    pair: &GroupPair,
    config: &SignificanceConfig,
) -> Result<SignificanceResult> {
    let groups = dataset.column(attribute);
    let groups = groups.categories()?;

    let mut first = Vec::new();
    let mut second = Vec::new();
    for (record, group) in dataset.iter().zip(groups) {
        if *group == pair.a {
            first.push(record.approved);
        } else if *group == pair.b {
            second.push(record.approved);
        }
    }

    let result = significance_test_with(&first, &second, config)?;
    tracing::debug!(
        attribute = attribute.as_str(),
        pair = %pair,
        chi2 = result.chi2_statistic,
        p_value = result.p_value,
        significant = result.significant,
        "group significance tested"
    );
    Ok(result)
}
