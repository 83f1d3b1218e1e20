use crate::model::default_true;

use serde::{Deserialize, Serialize};

/// Which input sources the engine captures while recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSettings {
    /// Capture cursor movement.
    #[serde(default = "default_true")]
    pub capture_mouse_move: bool,
    /// Capture mouse button presses, releases and wheel.
    #[serde(default = "default_true")]
    pub capture_mouse_clicks: bool,
    /// Capture key presses and releases.
    #[serde(default = "default_true")]
    pub capture_keyboard: bool,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            capture_mouse_move: true,
            capture_mouse_clicks: true,
            capture_keyboard: true,
        }
    }
}
