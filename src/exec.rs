//! External process boundary.
//!
//! Tools are invoked as child processes with captured stdout. The contract is
//! deliberately lossy: any failure to spawn, a timeout, or empty output all
//! collapse to `None` ("no usable output"), which callers treat as an absent
//! report rather than an error. Exit codes are not inspected -- analyzers
//! routinely exit non-zero when they find violations.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Directories a tool invocation runs against.
#[derive(Debug, Clone)]
pub struct ExecContext {
    /// Checked-out project sources; also the working directory of the child.
    pub project_dir: PathBuf,
    /// Location of tool binaries/jars that are not on PATH.
    pub tools_dir: PathBuf,
}

/// Synchronous command execution with captured stdout.
///
/// Implemented by [`SystemRunner`] for real invocations; tests substitute
/// stubs that return canned output.
pub trait CommandRunner {
    /// Runs `command` with `cwd` as working directory and returns captured
    /// stdout, or `None` when the process produced no usable output.
    fn run(&self, command: &str, cwd: &Path) -> Option<String>;
}

/// Runs commands via `std::process`, bounding each invocation with a timeout.
///
/// A tool that hangs would otherwise block the whole build; expiry is treated
/// the same as unparsable output.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &str, cwd: &Path) -> Option<String> {
        // POSIX shell-style quoting so paths with spaces survive splitting.
        let parts = match shell_words::split(command) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(command, error = %e, "could not parse command line");
                return None;
            }
        };
        let program = parts.first()?;

        let mut child = match Command::new(program)
            .args(&parts[1..])
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(command, error = %e, "failed to spawn tool process");
                return None;
            }
        };

        // Drain stdout on a separate thread so a chatty tool cannot fill the
        // pipe buffer and deadlock against our wait loop.
        let mut stdout = child.stdout.take()?;
        let reader = thread::spawn(move || {
            let mut buf = String::new();
            stdout.read_to_string(&mut buf).ok().map(|_| buf)
        });

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_status)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    tracing::warn!(command, "tool timed out, killing process");
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                Ok(None) => thread::sleep(Duration::from_millis(25)),
                Err(e) => {
                    tracing::warn!(command, error = %e, "failed waiting on tool process");
                    return None;
                }
            }
        }

        let output = reader.join().ok().flatten()?;
        if output.trim().is_empty() {
            None
        } else {
            Some(output)
        }
    }
}
