mod app_settings;
mod hotkey_settings;
mod macro_event;
mod macro_id;
mod playback_settings;
mod recorded_macro;
mod recording_settings;

pub use {
    app_settings::{AppSettings, AppSettingsPatch},
    hotkey_settings::HotkeySettings,
    macro_event::{MacroEvent, MacroEventKind, MouseButton},
    macro_id::MacroId,
    playback_settings::{PlaybackSettings, RepeatMode},
    recorded_macro::{Macro, MacroEdit},
    recording_settings::RecordingSettings,
};

/// Slowest allowed playback speed multiplier.
pub const MIN_PLAYBACK_SPEED: f64 = 0.25;
/// Fastest allowed playback speed multiplier.
pub const MAX_PLAYBACK_SPEED: f64 = 4.0;
/// Default pause between repetitions, in milliseconds.
pub const DEFAULT_REPEAT_INTERVAL_MS: u64 = 500;

pub(crate) fn default_repeat_interval_ms() -> u64 {
    DEFAULT_REPEAT_INTERVAL_MS
}

pub(crate) fn default_true() -> bool {
    true
}
