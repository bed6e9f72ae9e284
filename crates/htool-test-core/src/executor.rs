//! Subject tool execution.
//!
//! The harness only needs one capability from the outside world: run an
//! invocation string to completion and hand back its exit status and combined
//! output. [`Executor`] captures that so the runner can be driven by a fake in
//! tests.

use std::future::Future;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::Duration;
use tracing::debug;

/// Errors that can occur while executing the subject tool.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to spawn subject tool: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("execution timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Result of one subject tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Exit status; `128 + signal` when the process was killed by a signal.
    pub exit_status: i32,
    /// Combined stdout and stderr, in write order.
    pub output: String,
    pub latency_ms: u64,
}

/// Runs an invocation string and waits for it to finish.
pub trait Executor {
    /// Execute `command` and block until the child has exited.
    fn execute(&self, command: &str) -> impl Future<Output = Result<Execution, ExecError>> + Send;
}

/// Executor backed by the platform shell.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    pub timeout_ms: Option<u64>,
}

impl ProcessExecutor {
    #[must_use]
    pub const fn new(timeout_ms: Option<u64>) -> Self {
        Self { timeout_ms }
    }
}

impl Executor for ProcessExecutor {
    async fn execute(&self, command: &str) -> Result<Execution, ExecError> {
        let start = std::time::Instant::now();
        debug!(command, "executing subject tool");

        let mut cmd = Command::from(shell_command(command));
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // kill_on_drop ensures the child process is killed on timeout/drop
        cmd.kill_on_drop(true);

        let child = cmd.spawn()?;
        let pid = child.id();

        let output = match self.timeout_ms {
            Some(timeout_ms) => {
                match tokio::time::timeout(
                    Duration::from_millis(timeout_ms),
                    child.wait_with_output(),
                )
                .await
                {
                    Ok(output) => output?,
                    Err(_) => {
                        // Take down the shell and everything it started
                        kill_process_group(pid);
                        return Err(ExecError::Timeout { timeout_ms });
                    }
                }
            }
            None => child.wait_with_output().await?,
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        // stderr is already merged by the shell; anything left here came from
        // the shell itself (e.g. "not found")
        if !output.stderr.is_empty() {
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let exit_status = exit_code(output.status);
        debug!(exit_status, latency_ms, "subject tool exited");

        Ok(Execution {
            exit_status,
            output: text,
            latency_ms,
        })
    }
}

/// The shell leads a new process group so that a timeout can kill every
/// process the subject tool started, not just the shell.
#[cfg(unix)]
fn shell_command(command: &str) -> std::process::Command {
    use std::os::unix::process::CommandExt;

    let mut cmd = std::process::Command::new("sh");
    cmd.arg("-c")
        .arg(format!("exec 2>&1\n{command}"))
        .process_group(0);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("cmd");
    cmd.arg("/C").arg(format!("{command} 2>&1"));
    cmd
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pgid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) => debug!(pgid, "killed timed-out process group"),
        // ESRCH: every member already exited
        Err(e) => debug!(pgid, error = %e, "process group not killed"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Build the invocation string `<binary> <flags> <file>`.
///
/// The binary and file are quoted for the shell; flags are passed verbatim so
/// that several flags and `--key=value` forms reach the tool unchanged.
#[must_use]
pub fn build_invocation(binary: &str, flags: &str, file: &str) -> String {
    let flags = flags.trim();
    if flags.is_empty() {
        format!("{} {}", shell_quote(binary), shell_quote(file))
    } else {
        format!("{} {flags} {}", shell_quote(binary), shell_quote(file))
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '=' | ':' | '@' | '%' | '+' | ',')
}

#[cfg(unix)]
fn shell_quote(arg: &str) -> String {
    if !arg.is_empty() && arg.chars().all(is_shell_safe) {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(windows)]
fn shell_quote(arg: &str) -> String {
    if !arg.is_empty() && arg.chars().all(|c| is_shell_safe(c) || c == '\\') {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\"\""))
}
