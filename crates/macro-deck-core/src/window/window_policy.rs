use crate::window::{WindowMode, WindowSize};

use std::time::Duration;

/// Thresholds and targets for automatic window mode transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Size applied when snapping down to [`WindowMode::Mini`].
    pub compact_size: WindowSize,
    /// Size applied when snapping up to [`WindowMode::Normal`].
    pub normal_size: WindowSize,
    /// In `Normal`, a width or height below this snaps down.
    pub snap_down_below: WindowSize,
    /// In `Mini`, a width or height above this snaps up.
    pub snap_up_above: WindowSize,
    /// Quiet period before a resize burst is evaluated.
    pub debounce: Duration,
}

impl WindowPolicy {
    /// Mode a resize to `size` should lead to from `current`, if any.
    pub fn transition_for(&self, current: WindowMode, size: WindowSize) -> Option<WindowMode> {
        match current {
            WindowMode::Normal
                if size.width < self.snap_down_below.width
                    || size.height < self.snap_down_below.height =>
            {
                Some(WindowMode::Mini)
            }
            WindowMode::Mini
                if size.width > self.snap_up_above.width
                    || size.height > self.snap_up_above.height =>
            {
                Some(WindowMode::Normal)
            }
            _ => None,
        }
    }

    /// Size to apply when entering `mode`.
    pub fn target_size(&self, mode: WindowMode) -> WindowSize {
        match mode {
            WindowMode::Normal => self.normal_size,
            WindowMode::Mini => self.compact_size,
        }
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            compact_size: WindowSize::new(355, 140),
            normal_size: WindowSize::new(1000, 700),
            snap_down_below: WindowSize::new(500, 500),
            snap_up_above: WindowSize::new(360, 150),
            debounce: Duration::from_millis(200),
        }
    }
}
