//! YAML loader for the test manifest.

use crate::types::{Manifest, TestSuite};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the manifest.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("config path is not valid: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Load a test suite from a manifest file.
///
/// # Errors
/// Returns an error if:
/// - The file does not exist or cannot be read
/// - YAML parsing fails, including missing required fields
/// - Validation fails (empty suite name or case name)
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<TestSuite, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// Parse a test suite from manifest text.
///
/// # Errors
/// Returns an error if YAML parsing or validation fails.
pub fn parse_manifest(content: &str) -> Result<TestSuite, LoaderError> {
    let manifest: Manifest = serde_yml::from_str(content)?;
    validate_suite(&manifest.suite)?;
    Ok(manifest.suite)
}

fn validate_suite(suite: &TestSuite) -> Result<(), LoaderError> {
    if suite.name.trim().is_empty() {
        return Err(LoaderError::Validation(
            "suite_name cannot be empty".into(),
        ));
    }
    if suite.git.remote.trim().is_empty() {
        return Err(LoaderError::Validation(format!(
            "suite '{}' git remote cannot be empty",
            suite.name
        )));
    }
    for (index, case) in suite.tests.iter().enumerate() {
        if case.name.trim().is_empty() {
            return Err(LoaderError::Validation(format!(
                "test case #{index} in suite '{}' has an empty name",
                suite.name
            )));
        }
    }
    Ok(())
}
