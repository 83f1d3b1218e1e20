use crate::model::{MacroEvent, MacroId, PlaybackSettings, RecordingSettings};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved, replayable event sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macro {
    /// Unique id.
    pub id: MacroId,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Captured events, ordered by timestamp.
    pub events: Vec<MacroEvent>,
    /// Capture settings in effect when the macro was recorded.
    pub recording_settings: RecordingSettings,
    /// Default playback policy for this macro.
    pub playback_settings: PlaybackSettings,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Macro {
    /// Build a new macro from a finished recording.
    pub fn from_recording(
        name: impl Into<String>,
        events: Vec<MacroEvent>,
        recording_settings: RecordingSettings,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: MacroId::generate(),
            name: name.into(),
            description: None,
            events,
            recording_settings,
            playback_settings: PlaybackSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a user edit and bump `updated_at`.
    pub fn apply_edit(&mut self, edit: MacroEdit) {
        if let Some(name) = edit.name {
            self.name = name;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(playback_settings) = edit.playback_settings {
            self.playback_settings = playback_settings;
        }
        self.updated_at = Utc::now();
    }
}

/// User edit of a macro's metadata. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroEdit {
    /// New name.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New default playback settings.
    pub playback_settings: Option<PlaybackSettings>,
}
