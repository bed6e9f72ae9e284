//! Core data types for htool-test.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// Manifest types
// =============================================================================

/// Top-level manifest document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(rename = "TestSuite")]
    pub suite: TestSuite,
}

/// Where the fixture repository is cloned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitSource {
    pub remote: String,
    pub branch: String,
}

/// A named test suite loaded from the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSuite {
    /// Suite name, selects the scenario family (e.g. `macho-tests`).
    #[serde(rename = "suite_name")]
    pub name: String,

    /// Fixture repository provenance.
    pub git: GitSource,

    /// Test cases in execution order.
    pub tests: Vec<TestCase>,
}

/// A single invocation of the subject tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    /// Scenario name, e.g. `macho-test_valid-macho-file`.
    pub name: String,

    /// Raw command-line flags passed before the file argument.
    pub flags: String,

    /// Path to the input fixture.
    pub file: String,

    /// Expected architecture line for the architecture check (overrides config).
    #[serde(default)]
    pub arch: Option<String>,
}

// =============================================================================
// Harness configuration
// =============================================================================

/// Harness configuration from `htool-test.config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Fixture checkout directory (default: `htoolv3-tests`).
    #[serde(rename = "fixtures-dir", default = "default_fixtures_dir")]
    pub fixtures_dir: String,

    /// JUnit report path (default: `test.xml`).
    #[serde(rename = "report-path", default = "default_report_path")]
    pub report_path: PathBuf,

    /// Per-case timeout in milliseconds (default: none).
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Default expected architecture for the architecture check.
    #[serde(rename = "expected-arch", default = "default_expected_arch")]
    pub expected_arch: String,

    /// Assert a zero exit status for scenarios that expect a clean run.
    #[serde(rename = "check-exit-status", default)]
    pub check_exit_status: bool,
}

fn default_fixtures_dir() -> String {
    "htoolv3-tests".to_string()
}

fn default_report_path() -> PathBuf {
    PathBuf::from("test.xml")
}

fn default_expected_arch() -> String {
    "arm64e (ARMv8.5-A, MTE)".to_string()
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: default_fixtures_dir(),
            report_path: default_report_path(),
            timeout: None,
            expected_arch: default_expected_arch(),
            check_exit_status: false,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Status of a single assertion outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Pass,
    Fail,
    Skip,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Result of one check against one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Qualified name, `<suite>.<case>` (or `<suite>.segfault`).
    pub name: String,

    /// Label of the check that produced this outcome.
    pub check: String,

    pub status: OutcomeStatus,

    /// Present only on fail or skip.
    pub message: Option<String>,
}

impl Outcome {
    #[must_use]
    pub fn pass(name: impl Into<String>, check: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            check: check.into(),
            status: OutcomeStatus::Pass,
            message: None,
        }
    }

    #[must_use]
    pub fn fail(
        name: impl Into<String>,
        check: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            check: check.into(),
            status: OutcomeStatus::Fail,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn skip(
        name: impl Into<String>,
        check: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            check: check.into(),
            status: OutcomeStatus::Skip,
            message: Some(message.into()),
        }
    }
}

/// All outcomes produced for one suite.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub outcomes: Vec<Outcome>,
    /// Non-fatal messages such as unknown test cases.
    pub diagnostics: Vec<String>,
}

/// Outcome counts across all suites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteSummary {
    /// Count outcomes across the given reports.
    #[must_use]
    pub fn from_reports(reports: &[SuiteReport]) -> Self {
        reports
            .iter()
            .flat_map(|r| r.outcomes.iter())
            .fold(Self::default(), |mut acc, outcome| {
                acc.total += 1;
                match outcome.status {
                    OutcomeStatus::Pass => acc.passed += 1,
                    OutcomeStatus::Fail => acc.failed += 1,
                    OutcomeStatus::Skip => acc.skipped += 1,
                }
                acc
            })
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}
