use crate::events::{CustomData, ParameterChange, ProgramChange};

/// Host-visible notifications produced by the UI bridge.
///
/// The bridge never calls these from the audio thread; every callback fires
/// inside the host-driven `poll()` and runs on the polling thread. A handler
/// that does nothing for a given event simply leaves the default body.
pub trait UiEventHandler {
    /// The UI edited a parameter value.
    fn on_parameter_changed(&mut self, change: ParameterChange);

    /// The UI selected a MIDI program.
    fn on_program_changed(&mut self, change: ProgramChange);

    /// The UI updated a key/value configuration entry. Both strings are
    /// owned by the handler from this point on.
    fn on_custom_data_changed(&mut self, data: CustomData);

    /// The UI shut down in an orderly fashion; the process has terminated.
    fn on_ui_closed(&mut self) {}

    /// The UI process died without announcing shutdown. The plugin keeps
    /// running headless.
    fn on_ui_unavailable(&mut self) {}
}
