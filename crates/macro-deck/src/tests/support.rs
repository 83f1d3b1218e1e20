use macro_deck_core::{Macro, MacroEvent, MacroEventKind, RecordingSettings};

use std::{fs, path::PathBuf};

use uuid::Uuid;

/// Scratch directory removed on drop.
pub(crate) struct TempDir {
    pub(crate) path: PathBuf,
}

impl TempDir {
    pub(crate) fn new() -> Self {
        Self {
            path: std::env::temp_dir().join(format!("macro-deck-test-{}", Uuid::new_v4())),
        }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// `count` key presses `step_ms` apart, starting at zero.
pub(crate) fn key_events(count: u64, step_ms: u64) -> Vec<MacroEvent> {
    (0..count)
        .map(|i| {
            MacroEvent::new(
                i * step_ms,
                MacroEventKind::KeyPress {
                    key: "a".to_string(),
                },
            )
        })
        .collect()
}

pub(crate) fn sample_macro(name: &str) -> Macro {
    Macro::from_recording(name, key_events(3, 100), RecordingSettings::default())
}
