//! A UI child process wired to pipes, with non-blocking line reads.

use crate::line::normalize_line;
use crossbeam_channel::{Receiver, TryRecvError};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors from pipe and process operations.
#[derive(Debug, Error)]
pub enum PipeError {
    #[error("failed to spawn ui process: {0}")]
    SpawnFailed(std::io::Error),
    #[error("ui process has no stdin")]
    NoStdin,
    #[error("ui process has no stdout")]
    NoStdout,
    #[error("failed to write to ui process: {0}")]
    Write(std::io::Error),
}

/// Outcome of one non-blocking read attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRead {
    /// A complete inbound line, framing newline stripped.
    Line(String),
    /// Nothing pending right now.
    Empty,
    /// The pipe is closed; no further lines will ever arrive.
    Disconnected,
}

/// A running UI process and both ends of its pipe.
///
/// A dedicated reader thread owns the child's stdout and forwards complete
/// lines over a channel, so [`UiProcess::try_read_line`] never blocks the
/// polling thread. The write end stays on the caller's thread.
pub struct UiProcess {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    reader: Option<thread::JoinHandle<()>>,
}

impl UiProcess {
    /// Spawn `program` with `args`, stdin/stdout piped and stderr inherited.
    pub fn spawn(program: &Path, args: &[String]) -> Result<Self, PipeError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(PipeError::SpawnFailed)?;

        let stdin = child.stdin.take().ok_or(PipeError::NoStdin)?;
        let stdout = child.stdout.take().ok_or(PipeError::NoStdout)?;

        let (tx, rx) = crossbeam_channel::unbounded();
        let reader = thread::spawn(move || read_lines(stdout, tx));

        Ok(Self {
            child,
            stdin,
            lines: rx,
            reader: Some(reader),
        })
    }

    /// OS process id, for diagnostics.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Fetch one pending inbound line without blocking.
    pub fn try_read_line(&mut self) -> LineRead {
        match self.lines.try_recv() {
            Ok(line) => LineRead::Line(line),
            Err(TryRecvError::Empty) => LineRead::Empty,
            Err(TryRecvError::Disconnected) => LineRead::Disconnected,
        }
    }

    /// Write a single protocol line. Embedded newlines in `text` are
    /// normalized so the line boundary cannot be forged by content.
    pub fn write_line(&mut self, text: &str) -> Result<(), PipeError> {
        let fixed = normalize_line(text);
        writeln!(self.stdin, "{fixed}").map_err(PipeError::Write)?;
        self.stdin.flush().map_err(PipeError::Write)
    }

    /// Write a pre-assembled multi-line message in one call, so concurrent
    /// messages cannot interleave their lines. The caller is responsible for
    /// per-field normalization and trailing newlines.
    pub fn write_message(&mut self, message: &str) -> Result<(), PipeError> {
        self.stdin
            .write_all(message.as_bytes())
            .map_err(PipeError::Write)?;
        self.stdin.flush().map_err(PipeError::Write)
    }

    /// Whether the child is still alive.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Wait up to `timeout` for the child to exit on its own. Returns true
    /// once the child has exited.
    pub fn wait_timeout(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => return true,
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(error = %err, "failed to poll ui process status");
                    return false;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Give the child `grace` to exit, then force-kill it. Always reaps the
    /// process and joins the reader thread before returning.
    pub fn terminate(&mut self, grace: Duration) {
        if !self.wait_timeout(grace) {
            tracing::warn!(pid = self.id(), "ui process unresponsive, killing");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for UiProcess {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

fn read_lines(stdout: ChildStdout, tx: crossbeam_channel::Sender<String>) {
    let mut reader = BufReader::new(stdout);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                }
                if tx.send(line.clone()).is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "ui pipe read failed");
                break;
            }
        }
    }
}
