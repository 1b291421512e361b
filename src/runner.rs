//! Fail-soft external command execution
//!
//! Signal evaluators shell out to `git` and `bd`. Any of those can be missing,
//! hang, or fail, and none of that may abort a scan. Every invocation therefore
//! produces a [`CommandOutput`]: either the trimmed stdout of the process, or
//! [`CommandOutput::Absent`] carrying the reason the evidence is unavailable.
//!
//! Evaluators talk to a [`CommandRunner`] rather than `std::process` directly
//! so that tests can script tool output.

use crossbeam_channel::{bounded, RecvTimeoutError};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default timeout for a single external command
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a command produced no evidence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsentReason {
    /// Executable not found on PATH
    NotFound,
    /// Killed after exceeding the timeout
    TimedOut,
    /// Spawn/wait failure or an empty command
    Failed(String),
}

impl std::fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbsentReason::NotFound => write!(f, "executable not found"),
            AbsentReason::TimedOut => write!(f, "timed out"),
            AbsentReason::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

/// Outcome of running an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Process ran to completion; trimmed stdout (exit status is not inspected)
    Stdout(String),
    /// No evidence available
    Absent(AbsentReason),
}

impl CommandOutput {
    /// Non-empty stdout, or `None` when absent or blank.
    pub fn text(&self) -> Option<&str> {
        match self {
            CommandOutput::Stdout(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CommandOutput::Absent(_))
    }
}

/// Something that can execute an external program.
///
/// Implementations must never panic or propagate failures; anything that
/// goes wrong becomes [`CommandOutput::Absent`].
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> CommandOutput;
}

/// Runs real processes with a timeout and an optional working directory.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cwd: Option<PathBuf>,
    timeout: Duration,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self {
            cwd: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every command from this directory
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        if program.is_empty() {
            return CommandOutput::Absent(AbsentReason::Failed("empty command".to_string()));
        }

        debug!("Running {} {:?}", program, args);

        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::null());

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} not found", program);
                return CommandOutput::Absent(AbsentReason::NotFound);
            }
            Err(e) => {
                debug!("Failed to run {}: {}", program, e);
                return CommandOutput::Absent(AbsentReason::Failed(format!(
                    "failed to run {}: {}",
                    program, e
                )));
            }
        };

        wait_with_timeout(child, program, self.timeout)
    }
}

/// Poll the child until it exits or the timeout elapses.
///
/// Stdout is drained on a separate thread so a chatty process cannot block
/// on a full pipe while we poll. The deadline also bounds the wait for that
/// thread: a background grandchild holding the pipe open counts as a timeout.
fn wait_with_timeout(mut child: Child, program: &str, timeout: Duration) -> CommandOutput {
    let deadline = Instant::now() + timeout;
    let (tx, rx) = bounded::<Vec<u8>>(1);
    let has_stdout = match child.stdout.take() {
        Some(mut stdout) => {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stdout.read_to_end(&mut buf);
                let _ = tx.send(buf);
            });
            true
        }
        None => false,
    };

    loop {
        match child.try_wait() {
            Ok(Some(_status)) => break,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!("{} timed out after {}ms", program, timeout.as_millis());
                    return CommandOutput::Absent(AbsentReason::TimedOut);
                }
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => {
                let _ = child.kill();
                return CommandOutput::Absent(AbsentReason::Failed(format!(
                    "failed to wait for {}: {}",
                    program, e
                )));
            }
        }
    }

    if !has_stdout {
        return CommandOutput::Stdout(String::new());
    }

    let remaining = deadline.saturating_duration_since(Instant::now());
    let bytes = match rx.recv_timeout(remaining) {
        Ok(bytes) => bytes,
        Err(RecvTimeoutError::Timeout) => {
            warn!(
                "{} exited but its stdout stayed open past {}ms",
                program,
                timeout.as_millis()
            );
            return CommandOutput::Absent(AbsentReason::TimedOut);
        }
        Err(RecvTimeoutError::Disconnected) => {
            return CommandOutput::Absent(AbsentReason::Failed(format!(
                "stdout reader for {} panicked",
                program
            )))
        }
    };

    CommandOutput::Stdout(String::from_utf8_lossy(&bytes).trim().to_string())
}

/// Check whether a tool answers `--version`
pub fn is_tool_available(runner: &dyn CommandRunner, tool: &str) -> bool {
    !runner.run(tool, &["--version".to_string()]).is_absent()
}
