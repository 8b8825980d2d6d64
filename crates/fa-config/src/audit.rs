//! Audit configuration types.
//!
//! Every section has documented defaults, so an empty file (or no file at
//! all) yields a usable configuration.

use fa_common::{BoolAttribute, GroupPair};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::{ValidationError, ValidationResult};

/// Complete audit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub groups: GroupLabels,

    #[serde(default)]
    pub violations: ViolationConfig,

    #[serde(default)]
    pub intersectional: IntersectionalConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    #[serde(default)]
    pub significance: SignificanceConfig,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            groups: GroupLabels::default(),
            violations: ViolationConfig::default(),
            intersectional: IntersectionalConfig::default(),
            bootstrap: BootstrapConfig::default(),
            significance: SignificanceConfig::default(),
        }
    }
}

impl AuditConfig {
    /// Load a configuration file. `.toml` files parse as TOML, anything else as JSON.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::parse_toml(&content),
            _ => Self::parse_json(&content),
        }
    }

    /// Parse a configuration from a JSON string.
    pub fn parse_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Parse a configuration from a TOML string.
    pub fn parse_toml(text: &str) -> ValidationResult<Self> {
        toml::from_str(text).map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Render as pretty TOML.
    pub fn to_toml_string(&self) -> ValidationResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("TOML serialization failed: {}", e)))
    }
}

/// Category pairs compared by the group fairness metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLabels {
    /// Pair used for statistical parity and equal opportunity.
    #[serde(default = "GroupPair::requester")]
    pub requester: GroupPair,

    /// Pair used for predictive parity.
    #[serde(default = "GroupPair::premium")]
    pub premium: GroupPair,
}

impl Default for GroupLabels {
    fn default() -> Self {
        Self {
            requester: GroupPair::requester(),
            premium: GroupPair::premium(),
        }
    }
}

/// How the individual fairness scan enumerates candidate pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategy {
    /// Compare only rows with identical clinical feature vectors.
    #[default]
    Blocked,
    /// Compare every unordered pair.
    Exhaustive,
}

impl ScanStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStrategy::Blocked => "blocked",
            ScanStrategy::Exhaustive => "exhaustive",
        }
    }
}

/// Individual fairness violation scan parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViolationConfig {
    /// Minimum outcome difference (exclusive) for a pair to count.
    #[serde(default = "default_outcome_threshold")]
    pub outcome_threshold: f64,

    /// Minimum similarity (exclusive) for a pair to count. Must lie in [0, 1].
    #[serde(default = "default_similarity_bound")]
    pub similarity_bound: f64,

    #[serde(default)]
    pub strategy: ScanStrategy,
}

fn default_outcome_threshold() -> f64 {
    0.1
}

fn default_similarity_bound() -> f64 {
    0.9
}

impl Default for ViolationConfig {
    fn default() -> Self {
        Self {
            outcome_threshold: default_outcome_threshold(),
            similarity_bound: default_similarity_bound(),
            strategy: ScanStrategy::default(),
        }
    }
}

/// Intersectional analysis parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionalConfig {
    /// A combination is reported only when strictly more rows match.
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: usize,

    /// Attribute combinations to evaluate. The report lists subgroups in this order;
    /// a combination may appear only once.
    #[serde(default = "default_combinations")]
    pub combinations: Vec<Vec<BoolAttribute>>,
}

fn default_min_sample_size() -> usize {
    30
}

fn default_combinations() -> Vec<Vec<BoolAttribute>> {
    use BoolAttribute::{LocationRural, PremiumLimited, RequesterGp};
    vec![
        vec![PremiumLimited, RequesterGp],
        vec![PremiumLimited, LocationRural],
        vec![RequesterGp, LocationRural],
        vec![PremiumLimited, RequesterGp, LocationRural],
    ]
}

impl Default for IntersectionalConfig {
    fn default() -> Self {
        Self {
            min_sample_size: default_min_sample_size(),
            combinations: default_combinations(),
        }
    }
}

/// Bootstrap confidence interval parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Two-sided miscoverage; the interval spans the α/2 and 1−α/2 percentiles.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Fixed seed for reproducible resampling. Unseeded runs draw from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_iterations() -> usize {
    10_000
}

fn default_alpha() -> f64 {
    0.05
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            alpha: default_alpha(),
            seed: None,
        }
    }
}

impl BootstrapConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

/// Chi-square significance test parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificanceConfig {
    /// A result is significant when `p < alpha`.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Apply Yates' continuity correction.
    #[serde(default = "default_yates")]
    pub yates: bool,
}

fn default_yates() -> bool {
    true
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            yates: default_yates(),
        }
    }
}
