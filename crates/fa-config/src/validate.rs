//! Configuration validation errors and semantic validation.
//!
//! The engine calls the per-section validators at every entry point, so an
//! out-of-range parameter is a hard error whether or not the configuration
//! came from a file.

use std::collections::HashSet;
use thiserror::Error;

use crate::audit::{
    AuditConfig, BootstrapConfig, GroupLabels, IntersectionalConfig, SignificanceConfig,
    ViolationConfig,
};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 62,
            ValidationError::SemanticError(_) => 14,
            ValidationError::InvalidValue { .. } => 11,
            ValidationError::VersionMismatch { .. } => 15,
        }
    }

    fn invalid(field: &str, message: String) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message,
        }
    }
}

impl From<ValidationError> for fa_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidValue { field, message } => {
                fa_common::Error::InvalidParameter { field, message }
            }
            other => fa_common::Error::Config(other.to_string()),
        }
    }
}

/// Validate a complete audit configuration.
pub fn validate_audit_config(config: &AuditConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_group_labels(&config.groups)?;
    validate_violation_config(&config.violations)?;
    validate_intersectional_config(&config.intersectional)?;
    validate_bootstrap_config(&config.bootstrap)?;
    validate_significance_config(&config.significance)?;

    Ok(())
}

/// Each pair must name two distinct categories.
pub fn validate_group_labels(groups: &GroupLabels) -> ValidationResult<()> {
    for (field, pair) in [("groups.requester", &groups.requester), ("groups.premium", &groups.premium)] {
        if pair.a == pair.b {
            return Err(ValidationError::invalid(
                field,
                format!("Must compare two different categories, got {} twice", pair.a),
            ));
        }
    }
    Ok(())
}

pub fn validate_violation_config(config: &ViolationConfig) -> ValidationResult<()> {
    if !config.outcome_threshold.is_finite() || config.outcome_threshold < 0.0 {
        return Err(ValidationError::invalid(
            "violations.outcome_threshold",
            format!("Must be finite and >= 0, got {}", config.outcome_threshold),
        ));
    }

    // The blocked scan relies on the bound lying in [0, 1].
    if !(0.0..=1.0).contains(&config.similarity_bound) {
        return Err(ValidationError::invalid(
            "violations.similarity_bound",
            format!("Must be in [0, 1], got {}", config.similarity_bound),
        ));
    }

    Ok(())
}

pub fn validate_intersectional_config(config: &IntersectionalConfig) -> ValidationResult<()> {
    let mut combinations = HashSet::with_capacity(config.combinations.len());
    for (idx, combination) in config.combinations.iter().enumerate() {
        if !combinations.insert(combination) {
            return Err(ValidationError::invalid(
                &format!("intersectional.combinations[{}]", idx),
                "Combination is listed more than once".to_string(),
            ));
        }

        if combination.is_empty() {
            return Err(ValidationError::invalid(
                &format!("intersectional.combinations[{}]", idx),
                "Must name at least one attribute".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(combination.len());
        for attribute in combination {
            if !seen.insert(attribute) {
                return Err(ValidationError::invalid(
                    &format!("intersectional.combinations[{}]", idx),
                    format!("Attribute {} is repeated", attribute),
                ));
            }
        }
    }
    Ok(())
}

pub fn validate_bootstrap_config(config: &BootstrapConfig) -> ValidationResult<()> {
    validate_alpha("bootstrap.alpha", config.alpha)
}

pub fn validate_significance_config(config: &SignificanceConfig) -> ValidationResult<()> {
    validate_alpha("significance.alpha", config.alpha)
}

fn validate_alpha(field: &str, alpha: f64) -> ValidationResult<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(ValidationError::invalid(
            field,
            format!("Must be in (0, 1), got {}", alpha),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_common::{BoolAttribute, GroupPair};

    #[test]
    fn default_config_is_valid() {
        validate_audit_config(&AuditConfig::default()).unwrap();
    }

    #[test]
    fn negative_threshold_rejected() {
        let cfg = ViolationConfig {
            outcome_threshold: -0.5,
            ..Default::default()
        };
        let err = validate_violation_config(&cfg).unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "violations.outcome_threshold")
        );
    }

    #[test]
    fn nan_threshold_rejected() {
        let cfg = ViolationConfig {
            outcome_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(validate_violation_config(&cfg).is_err());
    }

    #[test]
    fn similarity_bound_must_be_unit_interval() {
        for bound in [-0.1, 1.5, f64::NAN] {
            let cfg = ViolationConfig {
                similarity_bound: bound,
                ..Default::default()
            };
            assert!(validate_violation_config(&cfg).is_err(), "bound {}", bound);
        }
        for bound in [0.0, 1.0] {
            let cfg = ViolationConfig {
                similarity_bound: bound,
                ..Default::default()
            };
            assert!(validate_violation_config(&cfg).is_ok());
        }
    }

    #[test]
    fn alpha_bounds_are_exclusive() {
        for alpha in [0.0, 1.0, -0.2, f64::NAN] {
            let cfg = BootstrapConfig {
                alpha,
                ..Default::default()
            };
            assert!(validate_bootstrap_config(&cfg).is_err(), "alpha {}", alpha);
        }
        let cfg = SignificanceConfig {
            alpha: 0.01,
            yates: false,
        };
        assert!(validate_significance_config(&cfg).is_ok());
    }

    #[test]
    fn duplicate_combination_rejected() {
        let cfg = IntersectionalConfig {
            min_sample_size: 30,
            combinations: vec![
                vec![BoolAttribute::PremiumLimited, BoolAttribute::RequesterGp],
                vec![BoolAttribute::LocationRural],
                vec![BoolAttribute::PremiumLimited, BoolAttribute::RequesterGp],
            ],
        };
        let err = validate_intersectional_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("combinations[2]"));
    }

    #[test]
    fn repeated_attribute_rejected() {
        let cfg = IntersectionalConfig {
            min_sample_size: 30,
            combinations: vec![vec![BoolAttribute::RequesterGp, BoolAttribute::RequesterGp]],
        };
        let err = validate_intersectional_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("repeated"));
    }

    #[test]
    fn empty_combination_rejected() {
        let cfg = IntersectionalConfig {
            min_sample_size: 30,
            combinations: vec![vec![]],
        };
        assert!(validate_intersectional_config(&cfg).is_err());
    }

    #[test]
    fn identical_group_pair_rejected() {
        let groups = GroupLabels {
            requester: GroupPair::new("GP", "GP"),
            ..Default::default()
        };
        assert!(validate_group_labels(&groups).is_err());
    }

    #[test]
    fn version_mismatch_detected() {
        let cfg = AuditConfig {
            schema_version: "0.9.0".to_string(),
            ..Default::default()
        };
        let err = validate_audit_config(&cfg).unwrap_err();
        assert_eq!(err.code(), 15);
    }

    #[test]
    fn converts_into_engine_error() {
        let err: fa_common::Error = ValidationError::InvalidValue {
            field: "bootstrap.alpha".into(),
            message: "Must be in (0, 1), got 2".into(),
        }
        .into();
        assert_eq!(err.code(), 11);

        let err: fa_common::Error = ValidationError::ParseError("bad".into()).into();
        assert_eq!(err.code(), 10);
    }
}
