use serde::{Deserialize, Serialize};

/// Mouse buttons the engine can capture and replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

/// Kind-specific payload of a captured input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MacroEventKind {
    /// Cursor moved to absolute screen coordinates.
    MouseMove {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
    },
    /// Mouse button pressed or released at a position.
    MouseClick {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
        /// Button that changed state.
        button: MouseButton,
        /// `true` on press, `false` on release.
        pressed: bool,
    },
    /// Keyboard key pressed.
    KeyPress {
        /// Engine key identifier.
        key: String,
    },
    /// Keyboard key released.
    KeyRelease {
        /// Engine key identifier.
        key: String,
    },
    /// Scroll wheel moved.
    MouseWheel {
        /// Horizontal scroll amount.
        delta_x: i64,
        /// Vertical scroll amount.
        delta_y: i64,
    },
}

/// A single captured input event.
///
/// Timestamps are relative to the recording start and non-decreasing within
/// a sequence. The first event need not be at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroEvent {
    /// Milliseconds since the recording started.
    pub timestamp_ms: u64,
    /// What happened.
    pub kind: MacroEventKind,
}

impl MacroEvent {
    /// Create an event at the given offset.
    pub fn new(timestamp_ms: u64, kind: MacroEventKind) -> Self {
        Self { timestamp_ms, kind }
    }

    /// Key identifier for keyboard events, `None` otherwise.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            MacroEventKind::KeyPress { key } | MacroEventKind::KeyRelease { key } => Some(key),
            _ => None,
        }
    }
}
