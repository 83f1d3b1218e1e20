use serde::{Deserialize, Serialize};

/// Global hotkey bindings, each a serialized key combination such as `F9`
/// or `shift+alt+KeyR`.
///
/// Changes only take effect once the engine has accepted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeySettings {
    /// Starts a recording.
    pub record_start: String,
    /// Stops the current recording.
    pub record_stop: String,
    /// Replays the working event buffer.
    pub playback_start: String,
    /// Stops the current playback.
    pub playback_stop: String,
}

impl HotkeySettings {
    /// All four bindings, in a fixed order.
    pub fn bindings(&self) -> [&str; 4] {
        [
            &self.record_start,
            &self.record_stop,
            &self.playback_start,
            &self.playback_stop,
        ]
    }

    /// Whether `key` is bound to any hotkey action.
    pub fn is_bound(&self, key: &str) -> bool {
        self.bindings().iter().any(|binding| binding.eq_ignore_ascii_case(key))
    }
}

impl Default for HotkeySettings {
    fn default() -> Self {
        Self {
            record_start: "F9".to_string(),
            record_stop: "F10".to_string(),
            playback_start: "F11".to_string(),
            playback_stop: "F12".to_string(),
        }
    }
}
