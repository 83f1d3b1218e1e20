use crate::model::{Macro, MacroEvent, MacroId, PlaybackSettings, RecordingSettings};

use chrono::Utc;

/// What to replay.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackSource {
    /// A raw event sequence, typically the working buffer.
    Events(Vec<MacroEvent>),
    /// A saved macro.
    Macro(Macro),
}

impl PlaybackSource {
    /// Events that would be replayed.
    pub fn events(&self) -> &[MacroEvent] {
        match self {
            PlaybackSource::Events(events) => events,
            PlaybackSource::Macro(macro_data) => &macro_data.events,
        }
    }

    /// Build the macro sent to the engine, carrying `settings`.
    pub(crate) fn into_macro(self, settings: PlaybackSettings) -> Macro {
        match self {
            PlaybackSource::Macro(mut macro_data) => {
                macro_data.playback_settings = settings;
                macro_data
            }
            PlaybackSource::Events(events) => {
                let now = Utc::now();
                Macro {
                    id: MacroId::generate(),
                    name: "Working buffer".to_string(),
                    description: None,
                    events,
                    recording_settings: RecordingSettings::default(),
                    playback_settings: settings,
                    created_at: now,
                    updated_at: now,
                }
            }
        }
    }
}
