use outboard_pipe::PipeError;
use thiserror::Error;

/// Errors surfaced across the host-facing bridge API.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("parameter index {index} out of range ({count} parameters)")]
    ParameterOutOfRange { index: u32, count: u32 },
    #[error("midi channel {channel} out of range ({max} channels)")]
    ChannelOutOfRange { channel: u8, max: u8 },
    #[error(transparent)]
    Pipe(#[from] PipeError),
}
