//! External UI bridge for native audio plugins.
//!
//! A plugin running inside a real-time host delegates its interface to a
//! separate UI process and exchanges state changes with it over a
//! line-oriented text protocol on the child's stdin/stdout:
//!
//! ```text
//! control\n<paramIndex>\n<value>\n
//! program\n<channel>\n<bank>\n<program>\n
//! configure\n<key>\n<value>\n
//! exiting\n
//! ```
//!
//! The crate provides:
//! - a [`ProcessSupervisor`] that owns the UI process and its pipe and
//!   distinguishes orderly exit from a crash
//! - an encoder and decoder for the wire protocol
//! - a [`UiBridge`] lifecycle controller the host drives with
//!   `set_visible` and periodic non-blocking `poll` calls
//!
//! Host notifications arrive through `outboard_core::UiEventHandler`; the
//! UI going away, cleanly or not, is never fatal to the plugin.

mod controller;
mod decoder;
mod encoder;
mod error;
mod supervisor;

pub use controller::{UiBridge, UiDescriptor};
pub use error::BridgeError;
pub use supervisor::{ProcessSupervisor, SupervisorState};
