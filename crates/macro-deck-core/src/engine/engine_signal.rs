use crate::{hotkey::HotkeySignal, window::WindowSize};

/// Fire-and-forget notifications delivered by the engine or the host window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSignal {
    /// A global hotkey was pressed.
    Hotkey(HotkeySignal),
    /// The recorder dropped or flagged something during capture.
    RecordingWarning(String),
    /// The host window was resized.
    Resize(WindowSize),
}
