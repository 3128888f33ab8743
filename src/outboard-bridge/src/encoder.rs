//! Outbound message encoding.
//!
//! Each event becomes one command line plus one line per field. A whole
//! message is assembled into a single buffer so the supervisor can write it
//! in one call and no other message can interleave its lines.

use crate::error::BridgeError;
use outboard_core::{CustomData, ParameterChange, ProgramChange, MAX_MIDI_CHANNELS};
use outboard_pipe::normalize_line;
use std::fmt::Write;

/// Encode a parameter edit. Rejected before any bytes are produced when the
/// index is outside the plugin's parameter list.
///
/// The value uses Rust's shortest-roundtrip float formatting, which is
/// locale-independent and reconstructs the exact value on parse.
pub(crate) fn control_message(
    change: ParameterChange,
    parameter_count: u32,
) -> Result<String, BridgeError> {
    if change.index >= parameter_count {
        return Err(BridgeError::ParameterOutOfRange {
            index: change.index,
            count: parameter_count,
        });
    }

    let mut message = String::from("control\n");
    let _ = writeln!(message, "{}", change.index);
    let _ = writeln!(message, "{}", change.value);
    Ok(message)
}

/// Encode a program selection. Rejected when the channel is not a valid
/// MIDI channel.
pub(crate) fn program_message(change: ProgramChange) -> Result<String, BridgeError> {
    if change.channel >= MAX_MIDI_CHANNELS {
        return Err(BridgeError::ChannelOutOfRange {
            channel: change.channel,
            max: MAX_MIDI_CHANNELS,
        });
    }

    let mut message = String::from("program\n");
    let _ = writeln!(message, "{}", change.channel);
    let _ = writeln!(message, "{}", change.bank);
    let _ = writeln!(message, "{}", change.program);
    Ok(message)
}

/// Encode a key/value configuration entry. Field content is normalized per
/// line so embedded newlines cannot break the one-line-per-field framing.
pub(crate) fn configure_message(data: &CustomData) -> String {
    let mut message = String::from("configure\n");
    let _ = writeln!(message, "{}", normalize_line(&data.key));
    let _ = writeln!(message, "{}", normalize_line(&data.value));
    message
}
