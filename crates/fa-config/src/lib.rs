//! Fairness audit configuration loading and validation.
//!
//! This crate provides:
//! - Typed parameter structs for every engine entry point, bundled as
//!   [`AuditConfig`]
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod audit;
pub mod resolve;
pub mod validate;

pub use audit::{
    AuditConfig, BootstrapConfig, GroupLabels, IntersectionalConfig, ScanStrategy,
    SignificanceConfig, ViolationConfig,
};
pub use resolve::{load_config, resolve_config, ConfigPath, ConfigSource, LoadedConfig};
pub use validate::{validate_audit_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
