//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths → defaults.

use std::path::{Path, PathBuf};

use crate::audit::AuditConfig;
use crate::validate::{validate_audit_config, ValidationError, ValidationResult};

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Discovered configuration file path.
#[derive(Debug, Clone, Default)]
pub struct ConfigPath {
    /// Path to the config file (None means built-in defaults).
    pub path: Option<PathBuf>,

    /// Source of the path (for diagnostics).
    pub source: ConfigSource,
}

/// A resolved, parsed, and validated configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AuditConfig,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Environment variable names.
const ENV_CONFIG_PATH: &str = "FA_AUDIT_CONFIG";
const ENV_CONFIG_DIR: &str = "FA_CONFIG_DIR";

/// Standard config file name.
const CONFIG_FILENAME: &str = "audit.toml";

/// Application name for XDG directories.
const APP_NAME: &str = "fairness-audit";

/// Resolve the configuration path.
///
/// 1. Explicit CLI path. A missing CLI path is an error, not a fallthrough.
/// 2. `FA_AUDIT_CONFIG` (direct path)
/// 3. `FA_CONFIG_DIR` + `audit.toml`
/// 4. XDG config directory (`~/.config/fairness-audit/audit.toml`)
/// 5. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ValidationResult<ConfigPath> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(ValidationError::IoError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(ConfigPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        });
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(ConfigPath {
                path: Some(path),
                source: ConfigSource::Environment,
            });
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return Ok(ConfigPath {
                path: Some(path),
                source: ConfigSource::Environment,
            });
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return Ok(ConfigPath {
                path: Some(path),
                source: ConfigSource::XdgConfig,
            });
        }
    }

    Ok(ConfigPath::default())
}

/// Resolve, parse, and validate the configuration.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<LoadedConfig> {
    let resolved = resolve_config(cli_path)?;
    let config = match &resolved.path {
        Some(path) => AuditConfig::from_file(path)?,
        None => AuditConfig::default(),
    };
    validate_audit_config(&config)?;

    Ok(LoadedConfig {
        config,
        path: resolved.path,
        source: resolved.source,
    })
}

/// Get the XDG config directory for the fairness audit.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
