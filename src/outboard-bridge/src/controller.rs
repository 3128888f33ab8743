//! Host-facing lifecycle controller for the external UI.

use crate::decoder::{Decoded, MessageDecoder, UiMessage};
use crate::encoder;
use crate::error::BridgeError;
use crate::supervisor::{ProcessSupervisor, SupervisorState};
use outboard_core::{
    BridgeSettings, CustomData, ParameterChange, ProgramChange, UiEventHandler, UiState,
};
use outboard_pipe::LineRead;
use std::path::PathBuf;
use std::time::Duration;

/// Everything the host knows about the UI that the bridge needs at start.
#[derive(Debug, Clone)]
pub struct UiDescriptor {
    /// Directory holding the plugin's bundled resources.
    pub resource_dir: PathBuf,
    /// UI executable path, relative to the resource directory.
    pub ui_path: PathBuf,
    /// Window title handed to the UI process.
    pub ui_name: String,
    /// Host sample rate handed to the UI process.
    pub sample_rate: f64,
    /// Number of plugin parameters; bounds outgoing parameter edits.
    pub parameter_count: u32,
}

/// Bridges a plugin to its external UI process.
///
/// The bridge composes a [`ProcessSupervisor`] (process lifecycle and pipe
/// ownership) with the message encoder and decoder; host notifications go
/// through the [`UiEventHandler`] passed to [`UiBridge::poll`]. Nothing here
/// blocks: `poll` drains whatever lines are pending and returns.
pub struct UiBridge {
    descriptor: UiDescriptor,
    supervisor: ProcessSupervisor,
    decoder: MessageDecoder,
    ui_state: UiState,
    poll_line_budget: usize,
}

impl UiBridge {
    pub fn new(descriptor: UiDescriptor, settings: &BridgeSettings) -> Self {
        Self {
            descriptor,
            supervisor: ProcessSupervisor::new(
                Duration::from_millis(settings.stop_timeout_ms),
                Duration::from_millis(settings.exit_wait_ms),
            ),
            decoder: MessageDecoder::default(),
            ui_state: UiState::None,
            poll_line_budget: settings.poll_line_budget.max(1),
        }
    }

    /// Show or hide the UI. Both directions are idempotent: showing an
    /// already-visible UI raises its window instead of spawning a second
    /// process, hiding a stopped UI does nothing.
    pub fn set_visible(&mut self, show: bool) -> Result<(), BridgeError> {
        if show {
            let path = self.descriptor.resource_dir.join(&self.descriptor.ui_path);
            tracing::info!(path = %path.display(), "starting external ui");
            self.supervisor
                .start(&path, self.descriptor.sample_rate, &self.descriptor.ui_name)?;
        } else {
            self.supervisor.stop();
        }
        Ok(())
    }

    /// Whether the UI process is currently up.
    pub fn is_ui_running(&self) -> bool {
        self.supervisor.state() == SupervisorState::Running
    }

    /// One non-blocking service cycle, to be driven by the host at
    /// UI-refresh rates. Drains pending inbound lines through the decoder,
    /// then surfaces at most one lifecycle transition to the handler.
    pub fn poll(&mut self, handler: &mut dyn UiEventHandler) {
        if !self.supervisor.is_connected() {
            return;
        }

        self.drain(handler);

        match std::mem::take(&mut self.ui_state) {
            UiState::None | UiState::Show => {}
            UiState::Hide => handler.on_ui_closed(),
            UiState::Crashed => handler.on_ui_unavailable(),
        }
    }

    /// Forward a parameter edit to the UI. Precondition-checked before any
    /// bytes are written; dropped silently when the UI is not running.
    pub fn send_parameter_value(&mut self, change: ParameterChange) -> Result<(), BridgeError> {
        let message = encoder::control_message(change, self.descriptor.parameter_count)?;
        self.supervisor.write_message(&message)?;
        Ok(())
    }

    /// Forward a program selection to the UI.
    pub fn send_program(&mut self, change: ProgramChange) -> Result<(), BridgeError> {
        let message = encoder::program_message(change)?;
        self.supervisor.write_message(&message)?;
        Ok(())
    }

    /// Forward a key/value configuration entry to the UI.
    pub fn send_custom_data(&mut self, data: &CustomData) -> Result<(), BridgeError> {
        let message = encoder::configure_message(data);
        self.supervisor.write_message(&message)?;
        Ok(())
    }

    fn drain(&mut self, handler: &mut dyn UiEventHandler) {
        let mut disconnected = false;
        let mut budget = self.poll_line_budget;
        while budget > 0 {
            match self.supervisor.try_read_line() {
                LineRead::Line(line) => {
                    self.decoder.push_line(line);
                    budget -= 1;
                }
                LineRead::Empty => break,
                LineRead::Disconnected => {
                    disconnected = true;
                    break;
                }
            }
        }

        self.dispatch(handler);

        // A disconnect after an orderly `exiting` has already stopped the
        // supervisor; only an unexpected one counts as a crash.
        if disconnected
            && matches!(
                self.supervisor.state(),
                SupervisorState::Starting | SupervisorState::Running
            )
        {
            self.supervisor.mark_crashed();
            self.ui_state = UiState::Crashed;
        }
    }

    fn dispatch(&mut self, handler: &mut dyn UiEventHandler) {
        while let Some(decoded) = self.decoder.next_message() {
            match decoded {
                Decoded::Message(UiMessage::Ready) => {
                    tracing::debug!("ui reported ready");
                    self.ui_state = UiState::Show;
                }
                Decoded::Message(UiMessage::Control(change)) => {
                    handler.on_parameter_changed(change);
                }
                Decoded::Message(UiMessage::Program(change)) => {
                    handler.on_program_changed(change);
                }
                Decoded::Message(UiMessage::Configure(data)) => {
                    handler.on_custom_data_changed(data);
                }
                Decoded::Message(UiMessage::Exiting) => {
                    self.supervisor.wait_child_close();
                    self.ui_state = UiState::Hide;
                }
                Decoded::Dropped => {}
                Decoded::Unhandled(command) => {
                    tracing::error!(command = %command, "unhandled ui message");
                }
            }
        }
    }
}
