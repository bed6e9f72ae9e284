//! Configuration loader for htool-test.

use crate::types::HarnessConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional harness configuration file.
pub const CONFIG_FILE_NAME: &str = "htool-test.config.yaml";

/// Errors that can occur during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("fixtures-dir cannot be empty")]
    EmptyFixturesDir,
}

/// Load harness configuration from `htool-test.config.yaml` in `dir`.
///
/// If the file doesn't exist, returns default configuration.
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The YAML is invalid
/// - timeout is zero or fixtures-dir is empty
pub fn load_config(dir: &Path) -> Result<HarnessConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    let config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        serde_yml::from_str(&content)?
    } else {
        HarnessConfig::default()
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &HarnessConfig) -> Result<(), ConfigError> {
    if config.timeout == Some(0) {
        return Err(ConfigError::ZeroTimeout);
    }
    if config.fixtures_dir.trim().is_empty() {
        return Err(ConfigError::EmptyFixturesDir);
    }
    Ok(())
}

/// CLI override options for configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub fixtures_dir: Option<String>,
    pub report_path: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub expected_arch: Option<String>,
    pub check_exit_status: Option<bool>,
}

/// Apply CLI overrides to a configuration.
///
/// # Errors
/// Returns an error if the overridden configuration is invalid.
pub fn apply_overrides(
    mut config: HarnessConfig,
    overrides: &ConfigOverrides,
) -> Result<HarnessConfig, ConfigError> {
    if let Some(ref dir) = overrides.fixtures_dir {
        config.fixtures_dir.clone_from(dir);
    }
    if let Some(ref path) = overrides.report_path {
        config.report_path.clone_from(path);
    }
    if let Some(timeout) = overrides.timeout {
        config.timeout = Some(timeout);
    }
    if let Some(ref arch) = overrides.expected_arch {
        config.expected_arch.clone_from(arch);
    }
    if let Some(check) = overrides.check_exit_status {
        config.check_exit_status = check;
    }
    validate_config(&config)?;
    Ok(config)
}
