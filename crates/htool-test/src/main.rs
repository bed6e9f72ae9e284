//! htool-test CLI - CI test harness for the HTool binary.

use clap::Parser;
use comfy_table::{Cell, Color, Table};
use htool_test_core::{
    ConfigOverrides, EvalOptions, HarnessConfig, Outcome, OutcomeStatus, ProcessExecutor,
    ProgressEvent, Reporter, ReporterConfig, RunOptions, SuiteSummary, acquire_fixtures,
    apply_overrides, init_logging, load_config, load_manifest, run_suite, write_report,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tokio::sync::mpsc;

/// Exit codes for the CLI.
mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const TESTS_FAILED: u8 = 1;
    pub const CONFIG_ERROR: u8 = 2;
    pub const EXECUTION_ERROR: u8 = 3;
}

/// One row of the verbose per-case table.
struct CaseRow {
    case: String,
    exit_status: Option<i32>,
    latency_ms: u64,
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl CaseRow {
    fn new(
        case: String,
        exit_status: Option<i32>,
        latency_ms: u64,
        outcomes: &[Outcome],
    ) -> Self {
        let count = |status| outcomes.iter().filter(|o| o.status == status).count();
        Self {
            case,
            exit_status,
            latency_ms,
            passed: count(OutcomeStatus::Pass),
            failed: count(OutcomeStatus::Fail),
            skipped: count(OutcomeStatus::Skip),
        }
    }
}

#[derive(Parser)]
#[command(name = "htool-test")]
#[command(about = "CI test harness for the HTool Mach-O inspection binary")]
#[command(version)]
struct Cli {
    /// Manifest file containing the tests to run
    #[arg(short, long, value_name = "CONFIG")]
    config: PathBuf,

    /// HTool binary to run the tests with
    #[arg(short, long, value_name = "BIN")]
    bin: PathBuf,

    /// JUnit XML output path (overrides config, default: test.xml)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Per-case timeout in milliseconds (overrides config)
    #[arg(long)]
    timeout: Option<u64>,

    /// Expected architecture string for the architecture check (overrides config)
    #[arg(long)]
    arch: Option<String>,

    /// Fixture checkout directory (overrides config, default: htoolv3-tests)
    #[arg(long)]
    fixtures_dir: Option<String>,

    /// Fail clean-run scenarios whose process exits non-zero
    #[arg(long)]
    check_exit_status: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, !cli.no_color && std::io::stderr().is_terminal());
    run_command(&cli).await
}

fn resolve_config(cli: &Cli, dir: &Path) -> Result<HarnessConfig, String> {
    let config = load_config(dir).map_err(|e| format!("Failed to load harness config: {e}"))?;
    let overrides = ConfigOverrides {
        fixtures_dir: cli.fixtures_dir.clone(),
        report_path: cli.output.clone(),
        timeout: cli.timeout,
        expected_arch: cli.arch.clone(),
        check_exit_status: if cli.check_exit_status {
            Some(true)
        } else {
            None
        },
    };
    apply_overrides(config, &overrides).map_err(|e| format!("Invalid harness config: {e}"))
}

fn print_case_table(rows: &[CaseRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        "Test Case",
        "Exit",
        "Latency",
        "Passed",
        "Failed",
        "Skipped",
    ]);

    for row in rows {
        let failed_cell = if row.failed > 0 {
            Cell::new(row.failed).fg(Color::Red)
        } else {
            Cell::new(row.failed).fg(Color::Green)
        };
        let skipped_cell = if row.skipped > 0 {
            Cell::new(row.skipped).fg(Color::Yellow)
        } else {
            Cell::new(row.skipped)
        };

        table.add_row(vec![
            Cell::new(&row.case),
            Cell::new(
                row.exit_status
                    .map_or_else(|| "timeout".to_string(), |s| s.to_string()),
            ),
            Cell::new(format!("{}ms", row.latency_ms)),
            Cell::new(row.passed),
            failed_cell,
            skipped_cell,
        ]);
    }

    println!("{table}");
}

#[allow(clippy::too_many_lines)]
async fn run_command(cli: &Cli) -> ExitCode {
    let reporter = Reporter::new(ReporterConfig {
        verbose: cli.verbose,
        color: !cli.no_color,
    });

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            reporter.error(&format!("Failed to resolve working directory: {e}"));
            return ExitCode::from(exit_code::CONFIG_ERROR);
        }
    };

    let config = match resolve_config(cli, &cwd) {
        Ok(c) => c,
        Err(e) => {
            reporter.error(&e);
            return ExitCode::from(exit_code::CONFIG_ERROR);
        }
    };

    println!("config file: {}", cli.config.display());
    println!("htool bin: {}", cli.bin.display());

    let suite = match load_manifest(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            reporter.error(&format!("Failed to load config file: {e}"));
            return ExitCode::from(exit_code::CONFIG_ERROR);
        }
    };

    if let Err(e) = acquire_fixtures(
        &cwd,
        &config.fixtures_dir,
        &suite.git.remote,
        &suite.git.branch,
    )
    .await
    {
        reporter.error(&format!("Failed to acquire tests repository: {e}"));
        return ExitCode::from(exit_code::EXECUTION_ERROR);
    }

    let start_time = Instant::now();
    let executor = ProcessExecutor::new(config.timeout);
    let options = RunOptions {
        eval: EvalOptions {
            expected_arch: config.expected_arch.clone(),
            check_exit_status: config.check_exit_status,
        },
        timeout_ms: config.timeout,
    };

    // Set up progress channel for real-time output
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<ProgressEvent>();

    let printer = reporter.clone();
    let progress_handle = tokio::spawn(async move {
        let mut rows = Vec::new();

        while let Some(event) = progress_rx.recv().await {
            match event {
                ProgressEvent::SuiteStarted { suite, case_count } => {
                    printer.suite_start(&suite, case_count);
                }
                ProgressEvent::CaseStarted { .. } => {}
                ProgressEvent::CaseCompleted {
                    case,
                    exit_status,
                    latency_ms,
                    outcomes,
                    ..
                } => {
                    printer.case_outcomes(&case, &outcomes);
                    rows.push(CaseRow::new(case, exit_status, latency_ms, &outcomes));
                }
                ProgressEvent::UnknownCase { case, .. } => {
                    printer.warn(&format!("unknown test case: {case}"));
                }
                ProgressEvent::UnknownSuite { suite } => {
                    printer.warn(&format!("unknown test suite: {suite}"));
                }
            }
            printer.flush();
        }

        rows
    });

    let binary = cli.bin.display().to_string();
    let result = run_suite(&suite, &binary, &executor, &options, Some(&progress_tx)).await;
    drop(progress_tx);

    let rows = progress_handle.await.unwrap_or_default();

    let report = match result {
        Ok(r) => r,
        Err(e) => {
            reporter.error(&format!("Test execution failed: {e}"));
            return ExitCode::from(exit_code::EXECUTION_ERROR);
        }
    };

    let reports = vec![report];
    if let Err(e) = write_report(&config.report_path, &reports) {
        reporter.error(&format!(
            "Failed to write report to {}: {e}",
            config.report_path.display()
        ));
        return ExitCode::from(exit_code::EXECUTION_ERROR);
    }

    let summary = SuiteSummary::from_reports(&reports);
    reporter.failures(&reports);
    reporter.summary(&summary, start_time.elapsed());
    println!("report: {}", config.report_path.display());

    if cli.verbose && !rows.is_empty() {
        println!("\n=== Test Cases ===");
        print_case_table(&rows);
    }

    if summary.is_success() {
        ExitCode::from(exit_code::SUCCESS)
    } else {
        ExitCode::from(exit_code::TESTS_FAILED)
    }
}
