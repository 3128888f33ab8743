//! Inbound message decoding.
//!
//! Messages are framed purely by fixed field counts per command word, so the
//! decoder buffers lines and only consumes a message once every field line
//! has arrived. A command whose fields fail to parse is consumed whole and
//! dropped, which keeps the line cursor aligned on the next message.

use outboard_core::{CustomData, ParameterChange, ProgramChange, MAX_MIDI_CHANNELS};
use std::collections::VecDeque;

/// A fully decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiMessage {
    /// Base protocol: the UI finished starting and is visible.
    Ready,
    Control(ParameterChange),
    Program(ProgramChange),
    Configure(CustomData),
    /// The UI is shutting down on its own initiative.
    Exiting,
}

/// Verdict for one consumed command.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Decoded {
    /// A well-formed message ready for dispatch.
    Message(UiMessage),
    /// A known command whose fields failed validation; consumed and dropped.
    Dropped,
    /// A command word neither protocol layer recognizes.
    Unhandled(String),
}

#[derive(Debug, Default)]
pub(crate) struct MessageDecoder {
    lines: VecDeque<String>,
}

impl MessageDecoder {
    pub fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
    }

    /// Decode the next complete message. Returns `None` when the buffer is
    /// empty or holds only a partial message; partial messages stay buffered
    /// untouched until their remaining field lines arrive.
    pub fn next_message(&mut self) -> Option<Decoded> {
        let command = self.lines.pop_front()?;

        let fields = match base_field_count(&command).or_else(|| plugin_field_count(&command)) {
            Some(fields) => fields,
            None => return Some(Decoded::Unhandled(command)),
        };

        if self.lines.len() < fields {
            self.lines.push_front(command);
            return None;
        }
        let args: Vec<String> = self.lines.drain(..fields).collect();

        if let Some(message) = decode_base(&command) {
            return Some(Decoded::Message(message));
        }
        Some(decode_plugin(&command, args))
    }
}

/// Connection-level commands, consulted before the plugin table.
fn base_field_count(command: &str) -> Option<usize> {
    match command {
        "ready" => Some(0),
        _ => None,
    }
}

fn decode_base(command: &str) -> Option<UiMessage> {
    match command {
        "ready" => Some(UiMessage::Ready),
        _ => None,
    }
}

fn plugin_field_count(command: &str) -> Option<usize> {
    match command {
        "control" | "configure" => Some(2),
        "program" => Some(3),
        "exiting" => Some(0),
        _ => None,
    }
}

fn decode_plugin(command: &str, args: Vec<String>) -> Decoded {
    match command {
        "control" => decode_control(&args),
        "program" => decode_program(&args),
        "configure" => decode_configure(args),
        "exiting" => Decoded::Message(UiMessage::Exiting),
        other => Decoded::Unhandled(other.to_string()),
    }
}

fn decode_control(args: &[String]) -> Decoded {
    let [index, value] = args else {
        return Decoded::Dropped;
    };
    let (Ok(index), Ok(value)) = (index.parse::<u32>(), value.parse::<f32>()) else {
        tracing::warn!(?args, "dropping malformed control message");
        return Decoded::Dropped;
    };
    Decoded::Message(UiMessage::Control(ParameterChange { index, value }))
}

fn decode_program(args: &[String]) -> Decoded {
    let [channel, bank, program] = args else {
        return Decoded::Dropped;
    };
    let (Ok(channel), Ok(bank), Ok(program)) = (
        channel.parse::<u32>(),
        bank.parse::<u32>(),
        program.parse::<u32>(),
    ) else {
        tracing::warn!(?args, "dropping malformed program message");
        return Decoded::Dropped;
    };
    if channel >= u32::from(MAX_MIDI_CHANNELS) {
        tracing::warn!(channel, "dropping program change for out-of-range midi channel");
        return Decoded::Dropped;
    }
    Decoded::Message(UiMessage::Program(ProgramChange {
        channel: channel as u8,
        bank,
        program,
    }))
}

fn decode_configure(mut args: Vec<String>) -> Decoded {
    let (Some(value), Some(key)) = (args.pop(), args.pop()) else {
        return Decoded::Dropped;
    };
    Decoded::Message(UiMessage::Configure(CustomData { key, value }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(lines: &[&str]) -> MessageDecoder {
        let mut decoder = MessageDecoder::default();
        for line in lines {
            decoder.push_line((*line).to_string());
        }
        decoder
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        let mut decoder = MessageDecoder::default();
        assert_eq!(decoder.next_message(), None);
    }

    #[test]
    fn decodes_control_message() {
        let mut decoder = feed(&["control", "3", "0.750000"]);
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Message(UiMessage::Control(ParameterChange {
                index: 3,
                value: 0.75,
            })))
        );
        assert_eq!(decoder.next_message(), None);
    }

    #[test]
    fn partial_message_is_deferred_until_complete() {
        let mut decoder = feed(&["control"]);
        assert_eq!(decoder.next_message(), None);

        decoder.push_line("3".into());
        assert_eq!(decoder.next_message(), None);

        decoder.push_line("0.5".into());
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Message(UiMessage::Control(ParameterChange {
                index: 3,
                value: 0.5,
            })))
        );
    }

    #[test]
    fn malformed_control_field_drops_whole_message() {
        let mut decoder = feed(&["control", "not-a-number", "0.5", "ready"]);
        assert_eq!(decoder.next_message(), Some(Decoded::Dropped));
        // Cursor stays aligned: the following message still decodes.
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Message(UiMessage::Ready))
        );
    }

    #[test]
    fn negative_index_is_malformed() {
        let mut decoder = feed(&["control", "-1", "0.5"]);
        assert_eq!(decoder.next_message(), Some(Decoded::Dropped));
    }

    #[test]
    fn decodes_program_message() {
        let mut decoder = feed(&["program", "2", "0", "17"]);
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Message(UiMessage::Program(ProgramChange {
                channel: 2,
                bank: 0,
                program: 17,
            })))
        );
    }

    #[test]
    fn out_of_range_channel_is_dropped_but_consumed() {
        let mut decoder = feed(&["program", "99", "0", "1", "exiting"]);
        assert_eq!(decoder.next_message(), Some(Decoded::Dropped));
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Message(UiMessage::Exiting))
        );
    }

    #[test]
    fn decodes_configure_message() {
        let mut decoder = feed(&["configure", "theme", "dark"]);
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Message(UiMessage::Configure(CustomData::new(
                "theme", "dark"
            ))))
        );
    }

    #[test]
    fn configure_fields_may_be_empty() {
        let mut decoder = feed(&["configure", "", ""]);
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Message(UiMessage::Configure(CustomData::new(
                "", ""
            ))))
        );
    }

    #[test]
    fn unknown_command_is_unhandled() {
        let mut decoder = feed(&["resize", "800", "600"]);
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Unhandled("resize".into()))
        );
    }

    #[test]
    fn ready_and_exiting_take_no_fields() {
        let mut decoder = feed(&["ready", "exiting"]);
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Message(UiMessage::Ready))
        );
        assert_eq!(
            decoder.next_message(),
            Some(Decoded::Message(UiMessage::Exiting))
        );
    }

    #[test]
    fn interleaved_stream_decodes_in_order() {
        let mut decoder = feed(&[
            "ready", "control", "0", "1", "program", "1", "2", "3", "configure", "a", "b",
        ]);
        let mut messages = Vec::new();
        while let Some(decoded) = decoder.next_message() {
            messages.push(decoded);
        }
        assert_eq!(messages.len(), 4);
        assert!(matches!(messages[0], Decoded::Message(UiMessage::Ready)));
        assert!(matches!(
            messages[3],
            Decoded::Message(UiMessage::Configure(_))
        ));
    }
}
