//! Core library for the htool-test CLI.
//!
//! This crate provides the pieces of the HTool CI harness:
//! - Manifest loading from YAML
//! - Fixture repository acquisition
//! - Subject tool execution and output classification
//! - Scenario evaluation into pass/fail/skip outcomes
//! - JUnit XML and console reporting

pub mod classify;
pub mod config;
pub mod evaluator;
pub mod executor;
pub mod fixtures;
pub mod junit;
pub mod loader;
pub mod logging;
pub mod reporter;
pub mod runner;
pub mod scenario;
pub mod types;

pub use classify::{LineClass, RunResult, classify_line, marker_message};
pub use config::{CONFIG_FILE_NAME, ConfigError, ConfigOverrides, apply_overrides, load_config};
pub use evaluator::{EvalOptions, crash_outcomes, evaluate, qualified_name, timeout_outcome};
pub use executor::{ExecError, Execution, Executor, ProcessExecutor, build_invocation};
pub use fixtures::{AcquisitionError, acquire_fixtures};
pub use junit::{ReportError, build_report, render_report, write_report};
pub use loader::{LoaderError, load_manifest, parse_manifest};
pub use logging::init_logging;
pub use reporter::{Reporter, ReporterConfig};
pub use runner::{ProgressEvent, ProgressSender, RunOptions, RunnerError, run_suite};
pub use scenario::{MACHO_SUITE, MarkerCheck, Scenario, find_scenario, scenarios_for_suite};
pub use types::*;
