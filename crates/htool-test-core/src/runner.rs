//! Test runner for executing a suite against the subject tool.

use crate::classify::RunResult;
use crate::evaluator::{EvalOptions, evaluate, timeout_outcome};
use crate::executor::{ExecError, Executor, build_invocation};
use crate::scenario::{find_scenario, scenarios_for_suite};
use crate::types::{Outcome, OutcomeStatus, SuiteReport, TestSuite};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Progress events emitted during suite execution.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The suite is starting.
    SuiteStarted { suite: String, case_count: usize },
    /// A test case invocation has started.
    CaseStarted { suite: String, case: String },
    /// A test case has been evaluated.
    CaseCompleted {
        suite: String,
        case: String,
        exit_status: Option<i32>,
        latency_ms: u64,
        outcomes: Vec<Outcome>,
    },
    /// A test case name has no scenario; it was not executed.
    UnknownCase { suite: String, case: String },
    /// The suite name selects no scenario family.
    UnknownSuite { suite: String },
}

/// Sender for progress events.
pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;

/// Errors that abort a suite run.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("failed to execute test case '{case}': {source}")]
    Execution {
        case: String,
        #[source]
        source: ExecError,
    },
}

/// Options for a suite run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub eval: EvalOptions,
    /// Timeout configured on the executor, reported in timeout outcomes.
    pub timeout_ms: Option<u64>,
}

fn emit(progress: Option<&ProgressSender>, event: ProgressEvent) {
    if let Some(tx) = progress {
        let _ = tx.send(event);
    }
}

/// Run every case of `suite` in manifest order, one at a time.
///
/// Unknown case names are reported as diagnostics and never executed. A
/// timed-out case is recorded as a failing outcome and the run continues.
///
/// # Errors
/// Returns an error if the subject tool cannot be spawned.
pub async fn run_suite<E: Executor + Sync>(
    suite: &TestSuite,
    binary: &str,
    executor: &E,
    options: &RunOptions,
    progress: Option<&ProgressSender>,
) -> Result<SuiteReport, RunnerError> {
    let mut report = SuiteReport {
        name: suite.name.clone(),
        ..SuiteReport::default()
    };

    let Some(table) = scenarios_for_suite(&suite.name) else {
        warn!(suite = %suite.name, "unknown test suite");
        report
            .diagnostics
            .push(format!("unknown test suite: {}", suite.name));
        emit(
            progress,
            ProgressEvent::UnknownSuite {
                suite: suite.name.clone(),
            },
        );
        return Ok(report);
    };

    emit(
        progress,
        ProgressEvent::SuiteStarted {
            suite: suite.name.clone(),
            case_count: suite.tests.len(),
        },
    );

    for case in &suite.tests {
        let Some(scenario) = find_scenario(table, &case.name) else {
            warn!(case = %case.name, "unknown test case");
            report
                .diagnostics
                .push(format!("unknown test case: {}", case.name));
            emit(
                progress,
                ProgressEvent::UnknownCase {
                    suite: suite.name.clone(),
                    case: case.name.clone(),
                },
            );
            continue;
        };

        emit(
            progress,
            ProgressEvent::CaseStarted {
                suite: suite.name.clone(),
                case: case.name.clone(),
            },
        );

        let command = build_invocation(binary, &case.flags, &case.file);
        let (outcomes, exit_status, latency_ms) = match executor.execute(&command).await {
            Ok(execution) => {
                let run = RunResult::from_output(execution.exit_status, &execution.output);
                let outcomes = evaluate(&suite.name, case, scenario, &run, &options.eval);
                (outcomes, Some(execution.exit_status), execution.latency_ms)
            }
            Err(ExecError::Timeout { timeout_ms }) => {
                warn!(case = %case.name, timeout_ms, "test case timed out");
                let timeout_ms = options.timeout_ms.unwrap_or(timeout_ms);
                (
                    vec![timeout_outcome(&suite.name, case, timeout_ms)],
                    None,
                    timeout_ms,
                )
            }
            Err(source) => {
                return Err(RunnerError::Execution {
                    case: case.name.clone(),
                    source,
                });
            }
        };

        let failed = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Fail)
            .count();
        info!(case = %case.name, outcomes = outcomes.len(), failed, "test case evaluated");

        emit(
            progress,
            ProgressEvent::CaseCompleted {
                suite: suite.name.clone(),
                case: case.name.clone(),
                exit_status,
                latency_ms,
                outcomes: outcomes.clone(),
            },
        );
        report.outcomes.extend(outcomes);
    }

    Ok(report)
}
