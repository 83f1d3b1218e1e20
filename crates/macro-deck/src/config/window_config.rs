use crate::config::{default_debounce_ms, default_size};

use macro_deck_core::{WindowPolicy, WindowSize};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Window sizes and automatic mode switching thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Quiet period before a resize is evaluated, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Size of the compact layout.
    #[serde(default = "default_size::compact")]
    pub compact_size: WindowSize,
    /// Size of the normal layout, also the initial window size.
    #[serde(default = "default_size::normal")]
    pub normal_size: WindowSize,
    /// Normal mode snaps down when width or height drops below this.
    #[serde(default = "default_size::snap_down_below")]
    pub snap_down_below: WindowSize,
    /// Mini mode snaps up when width or height grows above this.
    #[serde(default = "default_size::snap_up_above")]
    pub snap_up_above: WindowSize,
}

impl WindowConfig {
    /// Policy used by the window mode controller.
    pub fn policy(&self) -> WindowPolicy {
        WindowPolicy {
            compact_size: self.compact_size,
            normal_size: self.normal_size,
            snap_down_below: self.snap_down_below,
            snap_up_above: self.snap_up_above,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            compact_size: default_size::compact(),
            normal_size: default_size::normal(),
            snap_down_below: default_size::snap_down_below(),
            snap_up_above: default_size::snap_up_above(),
        }
    }
}
