//! Test output reporter with cargo test-like formatting.

use crate::types::{Outcome, OutcomeStatus, SuiteReport, SuiteSummary};
use std::io::{self, Write};
use std::time::Duration;

/// Reporter configuration.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Show verbose output (every outcome, not just failures).
    pub verbose: bool,
    /// Use colors in output.
    pub color: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
        }
    }
}

/// Test reporter with cargo test-like output.
#[derive(Debug, Clone)]
pub struct Reporter {
    config: ReporterConfig,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub const fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.config.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    /// Status word for an outcome, coloured if enabled.
    #[must_use]
    pub fn status_label(&self, status: OutcomeStatus) -> String {
        match status {
            OutcomeStatus::Pass => self.paint("ok", "32"),
            OutcomeStatus::Fail => self.paint("FAILED", "31"),
            OutcomeStatus::Skip => self.paint("skipped", "33"),
        }
    }

    /// Format a single outcome line.
    #[must_use]
    pub fn outcome_line(&self, outcome: &Outcome) -> String {
        format!(
            "test {}::{} ... {}",
            outcome.name,
            outcome.check,
            self.status_label(outcome.status)
        )
    }

    /// Print the start of a suite run.
    pub fn suite_start(&self, suite_name: &str, case_count: usize) {
        println!();
        println!("running {case_count} test cases for {suite_name}");
    }

    /// Print the outcomes of one case. Passing outcomes are shown only in
    /// verbose mode.
    pub fn case_outcomes(&self, case_name: &str, outcomes: &[Outcome]) {
        let failed = outcomes
            .iter()
            .any(|o| o.status == OutcomeStatus::Fail);
        let case_status = if failed {
            OutcomeStatus::Fail
        } else {
            OutcomeStatus::Pass
        };
        println!("case {case_name} ... {}", self.status_label(case_status));

        for outcome in outcomes {
            if self.config.verbose || outcome.status != OutcomeStatus::Pass {
                println!("  {}", self.outcome_line(outcome));
            }
        }
    }

    /// Print failures section.
    pub fn failures(&self, reports: &[SuiteReport]) {
        let failing: Vec<&Outcome> = reports
            .iter()
            .flat_map(|r| r.outcomes.iter())
            .filter(|o| o.status == OutcomeStatus::Fail)
            .collect();

        if failing.is_empty() {
            return;
        }

        println!();
        println!("failures:");
        println!();

        for outcome in failing {
            println!("---- {}::{} ----", outcome.name, outcome.check);
            if let Some(ref message) = outcome.message {
                for line in message.lines() {
                    println!("    {line}");
                }
            }
            println!();
        }
    }

    /// Print the final summary.
    pub fn summary(&self, summary: &SuiteSummary, duration: Duration) {
        let status = if summary.is_success() {
            self.paint("ok", "32")
        } else {
            self.paint("FAILED", "31")
        };

        println!();
        println!(
            "test result: {}. {} passed; {} failed; {} skipped; finished in {:.1}s",
            status,
            summary.passed,
            summary.failed,
            summary.skipped,
            duration.as_secs_f64()
        );
    }

    /// Print a warning message.
    pub fn warn(&self, message: &str) {
        eprintln!("{}: {message}", self.paint("warning", "33"));
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        eprintln!("{}: {message}", self.paint("error", "31"));
    }

    /// Flush stdout.
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}
