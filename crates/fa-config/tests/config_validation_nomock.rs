//! No-mock configuration validation + resolution tests.
//!
//! Covers:
//! - TOML and JSON fixtures parsed and validated
//! - Resolution order (CLI > env path > config dir > defaults)

use fa_common::BoolAttribute;
use fa_config::resolve::{load_config, resolve_config, ConfigSource};
use fa_config::validate::{validate_audit_config, ValidationError};
use fa_config::{AuditConfig, ScanStrategy};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const ENV_KEYS: [&str; 3] = ["FA_AUDIT_CONFIG", "FA_CONFIG_DIR", "XDG_CONFIG_HOME"];

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("test")
        .join("fixtures")
        .join("config")
}

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

/// Clear every resolution variable and point XDG at an empty directory.
fn isolated_env(xdg: &Path) -> EnvGuard {
    let guard = EnvGuard::new(&ENV_KEYS);
    env::remove_var("FA_AUDIT_CONFIG");
    env::remove_var("FA_CONFIG_DIR");
    env::set_var("XDG_CONFIG_HOME", xdg);
    guard
}

#[test]
fn test_toml_fixture_parses_and_validates() {
    let cfg = AuditConfig::from_file(&fixtures_dir().join("audit.toml")).expect("parse toml");
    validate_audit_config(&cfg).expect("valid fixture");

    assert_eq!(cfg.violations.similarity_bound, 0.95);
    assert_eq!(cfg.violations.strategy, ScanStrategy::Exhaustive);
    assert_eq!(cfg.intersectional.min_sample_size, 50);
    assert_eq!(
        cfg.intersectional.combinations[1],
        vec![
            BoolAttribute::PremiumLimited,
            BoolAttribute::LocationRural,
            BoolAttribute::ClinicalNecessity
        ]
    );
    assert_eq!(cfg.bootstrap.seed, Some(20240101));
    assert!(!cfg.significance.yates);
}

#[test]
fn test_json_fixture_fills_defaults() {
    let cfg = AuditConfig::from_file(&fixtures_dir().join("audit.json")).expect("parse json");
    validate_audit_config(&cfg).expect("valid fixture");

    assert_eq!(cfg.violations.similarity_bound, 0.8);
    assert_eq!(cfg.violations.outcome_threshold, 0.1);
    assert_eq!(cfg.bootstrap.iterations, 500);
    assert_eq!(cfg.intersectional.min_sample_size, 30);
}

#[test]
fn test_invalid_fixtures_fail_semantic_validation() {
    let alpha = AuditConfig::from_file(&fixtures_dir().join("invalid_alpha.toml")).expect("parse");
    let err = validate_audit_config(&alpha).unwrap_err();
    assert!(
        matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "bootstrap.alpha")
    );

    let threshold =
        AuditConfig::from_file(&fixtures_dir().join("invalid_threshold.json")).expect("parse");
    let err = validate_audit_config(&threshold).unwrap_err();
    assert!(err.to_string().contains("outcome_threshold"));
}

#[test]
fn test_resolution_defaults_without_files() {
    with_env_lock(|| {
        let xdg = TempDir::new().expect("tempdir");
        let _env = isolated_env(xdg.path());

        let resolved = resolve_config(None).expect("resolve");
        assert!(resolved.path.is_none());
        assert_eq!(resolved.source, ConfigSource::BuiltinDefault);

        let loaded = load_config(None).expect("load defaults");
        assert_eq!(loaded.config, AuditConfig::default());
    });
}

#[test]
fn test_resolution_order() {
    with_env_lock(|| {
        let xdg = TempDir::new().expect("tempdir");
        let _env = isolated_env(xdg.path());

        let dir = TempDir::new().expect("tempdir");
        let config_dir_file = dir.path().join("audit.toml");
        fs::copy(fixtures_dir().join("audit.toml"), &config_dir_file).expect("copy");
        env::set_var("FA_CONFIG_DIR", dir.path());

        let resolved = resolve_config(None).expect("resolve");
        assert_eq!(resolved.path.as_deref(), Some(config_dir_file.as_path()));
        assert_eq!(resolved.source, ConfigSource::Environment);

        // Direct env path beats the config dir.
        let direct = fixtures_dir().join("audit.json");
        env::set_var("FA_AUDIT_CONFIG", &direct);
        let resolved = resolve_config(None).expect("resolve");
        assert_eq!(resolved.path.as_deref(), Some(direct.as_path()));

        // CLI beats both.
        let cli = fixtures_dir().join("audit.toml");
        let loaded = load_config(Some(&cli)).expect("load");
        assert_eq!(loaded.source, ConfigSource::CliArgument);
        assert_eq!(loaded.config.intersectional.min_sample_size, 50);
    });
}

#[test]
fn test_xdg_config_used_when_env_unset() {
    with_env_lock(|| {
        let xdg = TempDir::new().expect("tempdir");
        let _env = isolated_env(xdg.path());

        let app_dir = xdg.path().join("fairness-audit");
        fs::create_dir_all(&app_dir).expect("mkdir");
        fs::write(app_dir.join("audit.toml"), "[violations]\nsimilarity_bound = 0.5\n")
            .expect("write");

        let loaded = load_config(None).expect("load");
        // dirs only honors XDG_CONFIG_HOME on Linux.
        if cfg!(target_os = "linux") {
            assert_eq!(loaded.source, ConfigSource::XdgConfig);
            assert_eq!(loaded.config.violations.similarity_bound, 0.5);
        }
    });
}

#[test]
fn test_load_rejects_invalid_file() {
    with_env_lock(|| {
        let xdg = TempDir::new().expect("tempdir");
        let _env = isolated_env(xdg.path());

        let err = load_config(Some(&fixtures_dir().join("invalid_alpha.toml"))).unwrap_err();
        assert_eq!(err.code(), 11);
    });
}
