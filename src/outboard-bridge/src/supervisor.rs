//! Lifecycle supervision of the external UI process.

use outboard_pipe::{LineRead, PipeError, UiProcess};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupervisorState {
    #[default]
    Stopped,
    Starting,
    Running,
    Crashed,
}

/// Starts and stops the UI process and classifies how it went away.
///
/// Exclusive owner of the pipe connection: the encoder and decoder reach the
/// wire only through the read/write methods here, and the connection is
/// valid only between `start` and `stop`/crash detection.
pub struct ProcessSupervisor {
    state: SupervisorState,
    process: Option<UiProcess>,
    stop_timeout: Duration,
    exit_wait: Duration,
}

impl ProcessSupervisor {
    pub fn new(stop_timeout: Duration, exit_wait: Duration) -> Self {
        Self {
            state: SupervisorState::Stopped,
            process: None,
            stop_timeout,
            exit_wait,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Whether a connection currently exists to drain or write to.
    pub fn is_connected(&self) -> bool {
        matches!(
            self.state,
            SupervisorState::Starting | SupervisorState::Running
        ) && self.process.is_some()
    }

    /// Spawn the UI executable with the startup handshake arguments and
    /// greet it with `show`. Starting an already-running UI does not spawn a
    /// second process; the existing window is asked to raise itself instead.
    /// Returns whether a new process was started.
    pub fn start(
        &mut self,
        program: &Path,
        sample_rate: f64,
        ui_name: &str,
    ) -> Result<bool, PipeError> {
        match self.state {
            SupervisorState::Starting | SupervisorState::Running => {
                if let Some(process) = self.process.as_mut() {
                    process.write_line("focus")?;
                }
                return Ok(false);
            }
            SupervisorState::Crashed => self.reset(),
            SupervisorState::Stopped => {}
        }

        self.state = SupervisorState::Starting;
        let args = vec![format!("{sample_rate}"), ui_name.to_string()];
        let mut process = match UiProcess::spawn(program, &args) {
            Ok(process) => process,
            Err(err) => {
                self.state = SupervisorState::Stopped;
                return Err(err);
            }
        };

        if let Err(err) = process.write_line("show") {
            self.state = SupervisorState::Stopped;
            return Err(err);
        }

        tracing::info!(pid = process.id(), path = %program.display(), "ui process started");
        self.process = Some(process);
        self.state = SupervisorState::Running;
        Ok(true)
    }

    /// Request a graceful shutdown, wait a bounded time, then force-kill.
    /// A no-op when nothing is running.
    pub fn stop(&mut self) {
        match self.state {
            SupervisorState::Stopped => return,
            SupervisorState::Crashed => {
                self.reset();
                return;
            }
            SupervisorState::Starting | SupervisorState::Running => {}
        }

        if let Some(process) = self.process.as_mut() {
            if process.is_running() {
                // The child may already be gone; quit is best-effort.
                if let Err(err) = process.write_line("quit") {
                    tracing::debug!(error = %err, "quit request not delivered");
                }
            }
            process.terminate(self.stop_timeout);
        }
        tracing::info!("ui process stopped");
        self.reset();
    }

    /// Record that the pipe closed without a prior `exiting` message.
    pub fn mark_crashed(&mut self) {
        if let Some(process) = self.process.as_mut() {
            tracing::warn!(pid = process.id(), "ui process crashed");
            process.terminate(Duration::from_millis(100));
        }
        self.process = None;
        self.state = SupervisorState::Crashed;
    }

    /// Orderly-exit path: the UI announced `exiting`, so wait for the child
    /// to finish its own teardown (bounded) before declaring it gone.
    pub fn wait_child_close(&mut self) {
        if let Some(mut process) = self.process.take() {
            process.terminate(self.exit_wait);
        }
        self.state = SupervisorState::Stopped;
    }

    /// Fetch one pending inbound line without blocking.
    pub fn try_read_line(&mut self) -> LineRead {
        match self.process.as_mut() {
            Some(process) => process.try_read_line(),
            None => LineRead::Disconnected,
        }
    }

    /// Write a fully assembled message. Silently dropped when the UI is not
    /// running, so hosts can keep forwarding state while the UI is hidden.
    pub fn write_message(&mut self, message: &str) -> Result<(), PipeError> {
        if !self.is_connected() {
            tracing::trace!("ui not running, message dropped");
            return Ok(());
        }
        match self.process.as_mut() {
            Some(process) => process.write_message(message),
            None => Ok(()),
        }
    }

    fn reset(&mut self) {
        self.process = None;
        self.state = SupervisorState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::time::Instant;

    #[cfg(unix)]
    fn script(contents: &str) -> tempfile::TempPath {
        use std::os::unix::fs::PermissionsExt;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "#!/bin/bash\n{contents}").unwrap();
        file.flush().unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
        file.into_temp_path()
    }

    fn supervisor() -> ProcessSupervisor {
        ProcessSupervisor::new(Duration::from_millis(200), Duration::from_millis(500))
    }

    #[test]
    fn stop_when_stopped_is_noop() {
        let mut supervisor = supervisor();
        supervisor.stop();
        assert_eq!(supervisor.state(), SupervisorState::Stopped);
        assert!(!supervisor.is_connected());
    }

    #[test]
    fn read_without_connection_reports_disconnected() {
        let mut supervisor = supervisor();
        assert_eq!(supervisor.try_read_line(), LineRead::Disconnected);
    }

    #[test]
    fn write_without_connection_is_dropped() {
        let mut supervisor = supervisor();
        assert!(supervisor.write_message("control\n0\n0.5\n").is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn start_twice_spawns_one_process() {
        let script = script("while IFS= read -r line; do [ \"$line\" = quit ] && exit 0; done");
        let path = script.to_path_buf();
        let mut supervisor = supervisor();

        assert!(supervisor.start(&path, 48000.0, "Test UI").unwrap());
        assert_eq!(supervisor.state(), SupervisorState::Running);
        assert!(!supervisor.start(&path, 48000.0, "Test UI").unwrap());

        supervisor.stop();
        assert_eq!(supervisor.state(), SupervisorState::Stopped);
    }

    #[test]
    #[cfg(unix)]
    fn stop_is_bounded_against_unresponsive_child() {
        let script = script("trap '' TERM; while true; do sleep 0.05; done");
        let mut supervisor = supervisor();
        supervisor
            .start(&script.to_path_buf(), 48000.0, "Test UI")
            .unwrap();

        let started = Instant::now();
        supervisor.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(supervisor.state(), SupervisorState::Stopped);
    }

    #[test]
    fn start_missing_program_leaves_stopped() {
        let mut supervisor = supervisor();
        let result = supervisor.start(Path::new("/nonexistent/outboard-ui"), 48000.0, "Test UI");
        assert!(result.is_err());
        assert_eq!(supervisor.state(), SupervisorState::Stopped);
    }
}
