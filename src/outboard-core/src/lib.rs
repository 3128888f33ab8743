pub mod config;
pub mod events;
pub mod handler;
pub mod logging;
pub mod paths;

pub use config::{
    BridgeSettings, Config, ConfigError, LogLevel, LoggingConfig, ValidationError,
};
pub use events::{CustomData, ParameterChange, ProgramChange, UiState, MAX_MIDI_CHANNELS};
pub use handler::UiEventHandler;
pub use logging::{init_logging, LoggingError, LoggingGuard};
pub use paths::{AppDirs, DirsError};

pub const APP_NAME: &str = "outboard";
pub const APP_AUTHOR: &str = "Outboard";
pub const APP_QUALIFIER: &str = "io";
