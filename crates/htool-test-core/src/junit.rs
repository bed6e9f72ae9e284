//! JUnit XML report generation.

use crate::types::{Outcome, OutcomeStatus, SuiteReport};
use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};
use std::path::Path;
use thiserror::Error;

/// Name of the top-level `<testsuites>` element.
pub const REPORT_NAME: &str = "htool-test";

/// Errors that can occur while writing the report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize JUnit report: {0}")]
    Serialize(#[from] quick_junit::SerializeError),
}

fn test_case(outcome: &Outcome) -> TestCase {
    let mut status = match outcome.status {
        OutcomeStatus::Pass => TestCaseStatus::success(),
        OutcomeStatus::Fail => TestCaseStatus::non_success(NonSuccessKind::Failure),
        OutcomeStatus::Skip => TestCaseStatus::skipped(),
    };
    if let Some(ref message) = outcome.message {
        status.set_message(message.as_str());
        status.set_description(message.as_str());
    }

    let mut case = TestCase::new(outcome.check.as_str(), status);
    case.set_classname(outcome.name.as_str());
    case
}

/// Build a JUnit report with one test suite per [`SuiteReport`].
#[must_use]
pub fn build_report(reports: &[SuiteReport]) -> Report {
    let mut report = Report::new(REPORT_NAME);
    for suite_report in reports {
        let mut suite = TestSuite::new(suite_report.name.as_str());
        suite.add_test_cases(suite_report.outcomes.iter().map(test_case));
        report.add_test_suite(suite);
    }
    report
}

/// Serialize the report to a string.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn render_report(reports: &[SuiteReport]) -> Result<String, ReportError> {
    Ok(build_report(reports).to_string()?)
}

/// Write the report to `path`, creating parent directories as needed.
///
/// # Errors
/// Returns an error if the file cannot be written or serialization fails.
pub fn write_report(path: &Path, reports: &[SuiteReport]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    build_report(reports).serialize(std::io::BufWriter::new(file))?;
    Ok(())
}
