//! Scenario evaluation.
//!
//! Produces the ordered outcome list for one test case from its classified
//! output. The evaluation is a pure function of its inputs.
//!
//! # Outcome order
//! | # | check | pass when | otherwise |
//! |---|-------|-----------|-----------|
//! | 1 | each required marker | an info line contains it | Fail (fixed message) |
//! | 2 | `architecture` (if enabled) | a line contains the expected arch | Fail (first `CPU: ` line) |
//! | 3 | `tool-errors` | bucket empty | Fail (numbered messages) |
//! | 4 | `library-errors` | bucket empty | Fail (numbered messages) |
//! | 5 | `warnings` | bucket empty | Skip (numbered messages) |
//! | 6 | `exit-status` (if enabled) | status 0 | Fail |
//! | 7 | `segfault`, one per crash line | - | Fail |

use crate::classify::{LineClass, RunResult, marker_message};
use crate::scenario::Scenario;
use crate::types::{Outcome, TestCase};

/// Substring that identifies a crashed run.
pub const CRASH_SIGNATURE: &str = "segmentation fault";

/// Prefix of the architecture line printed by the subject tool.
pub const CPU_LINE_PREFIX: &str = "CPU: ";

/// Options that are not part of the scenario table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalOptions {
    /// Expected architecture when the test case does not set one.
    pub expected_arch: String,
    /// Emit the exit-status check for scenarios expecting a clean exit.
    pub check_exit_status: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            expected_arch: "arm64e (ARMv8.5-A, MTE)".to_string(),
            check_exit_status: false,
        }
    }
}

/// Qualified outcome name for a case.
#[must_use]
pub fn qualified_name(suite: &str, case: &str) -> String {
    format!("{suite}.{case}")
}

/// Evaluate one test case run against its scenario.
#[must_use]
pub fn evaluate(
    suite: &str,
    case: &TestCase,
    scenario: &Scenario,
    run: &RunResult,
    options: &EvalOptions,
) -> Vec<Outcome> {
    let name = qualified_name(suite, &case.name);
    let mut outcomes = Vec::with_capacity(scenario.markers.len() + 5);

    for check in scenario.markers {
        if run.info.iter().any(|line| line.contains(check.marker)) {
            outcomes.push(Outcome::pass(&name, check.marker));
        } else {
            outcomes.push(Outcome::fail(&name, check.marker, check.failure));
        }
    }

    if scenario.architecture_check {
        let expected = case.arch.as_deref().unwrap_or(&options.expected_arch);
        outcomes.push(check_architecture(&name, run, expected));
    }

    outcomes.push(check_bucket(&name, "tool-errors", run, LineClass::ToolError));
    outcomes.push(check_bucket(
        &name,
        "library-errors",
        run,
        LineClass::LibraryError,
    ));
    outcomes.push(check_bucket(&name, "warnings", run, LineClass::Warning));

    if options.check_exit_status && scenario.expects_clean_exit {
        if run.exit_status == 0 {
            outcomes.push(Outcome::pass(&name, "exit-status"));
        } else {
            outcomes.push(Outcome::fail(
                &name,
                "exit-status",
                format!("Process exited with status {}", run.exit_status),
            ));
        }
    }

    outcomes.extend(crash_outcomes(suite, run));
    outcomes
}

fn check_architecture(name: &str, run: &RunResult, expected: &str) -> Outcome {
    if run.lines.iter().any(|line| line.contains(expected)) {
        return Outcome::pass(name, "architecture");
    }
    let message = run
        .lines
        .iter()
        .find(|line| line.contains(CPU_LINE_PREFIX))
        .map_or_else(
            || "Architecture line not found".to_string(),
            Clone::clone,
        );
    Outcome::fail(name, "architecture", message)
}

/// Pass on an empty bucket; otherwise fail (or skip, for warnings) with every
/// message numbered from 0.
fn check_bucket(name: &str, check: &str, run: &RunResult, class: LineClass) -> Outcome {
    let lines = run.bucket(class);
    if lines.is_empty() {
        return Outcome::pass(name, check);
    }
    let message = numbered_messages(lines, class.marker());
    match class {
        LineClass::Warning => Outcome::skip(name, check, message),
        _ => Outcome::fail(name, check, message),
    }
}

fn numbered_messages(lines: &[String], marker: &str) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{i}: {}", marker_message(line, marker)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One fail outcome per output line carrying the crash signature.
#[must_use]
pub fn crash_outcomes(suite: &str, run: &RunResult) -> Vec<Outcome> {
    run.lines
        .iter()
        .filter(|line| line.contains(CRASH_SIGNATURE))
        .map(|_| Outcome::fail(qualified_name(suite, "segfault"), "segfault", "Segmentation Fault"))
        .collect()
}

/// Outcome recorded when a case exceeds its execution timeout.
#[must_use]
pub fn timeout_outcome(suite: &str, case: &TestCase, timeout_ms: u64) -> Outcome {
    Outcome::fail(
        qualified_name(suite, &case.name),
        "timeout",
        format!("Execution timed out after {timeout_ms}ms"),
    )
}
