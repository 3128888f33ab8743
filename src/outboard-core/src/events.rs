use serde::{Deserialize, Serialize};

/// Number of MIDI channels addressable in a program change.
pub const MAX_MIDI_CHANNELS: u8 = 16;

/// UI lifecycle state as last reported by the external process.
///
/// The decoder records transitions here; the lifecycle controller reads and
/// resets the value once per poll cycle, so each transition is surfaced to
/// the host at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    /// No pending transition.
    #[default]
    None,
    /// The UI process reported it is up and visible.
    Show,
    /// The UI process announced an orderly shutdown and has terminated.
    Hide,
    /// The pipe closed without a prior `exiting` message.
    Crashed,
}

/// A parameter value edit, in either direction.
///
/// `index` is scoped to the plugin's parameter list; the sending side must
/// reject indices at or beyond the parameter count before any bytes hit the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub index: u32,
    pub value: f32,
}

/// A MIDI program selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramChange {
    pub channel: u8,
    pub bank: u32,
    pub program: u32,
}

/// An opaque key/value configuration entry exchanged with the UI.
///
/// Ownership of both strings moves into the callback that consumes the
/// event; nothing is retained by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomData {
    pub key: String,
    pub value: String,
}

impl CustomData {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
