use crate::{
    CoreResult, SessionError,
    model::{DEFAULT_REPEAT_INTERVAL_MS, MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED, default_repeat_interval_ms},
};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// How many times a macro is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Play exactly once.
    Once,
    /// Play a fixed number of times.
    Count(u32),
    /// Play until stopped.
    Infinite,
}

/// Speed and repeat policy for replaying a macro.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Speed multiplier in `[0.25, 4]`; 2.0 plays twice as fast.
    pub speed: f64,
    /// Repeat policy.
    pub repeat: RepeatMode,
    /// Pause between repetitions in milliseconds.
    #[serde(default = "default_repeat_interval_ms")]
    pub interval_ms: u64,
}

impl PlaybackSettings {
    /// Check speed range and repeat count.
    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        if !(MIN_PLAYBACK_SPEED..=MAX_PLAYBACK_SPEED).contains(&self.speed) {
            return Err(SessionError::InvalidSettings {
                reason: format!(
                    "speed {} outside [{}, {}]",
                    self.speed, MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.repeat == RepeatMode::Count(0) {
            return Err(SessionError::InvalidSettings {
                reason: "repeat count must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            repeat: RepeatMode::Once,
            interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
        }
    }
}
