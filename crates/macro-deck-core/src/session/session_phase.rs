use std::time::Instant;

use uuid::Uuid;

/// Session-level state machine.
///
/// Recording and playing are variants of one enum, so the session can never
/// be doing both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Neither recording nor playing.
    #[default]
    Idle,
    /// The engine is capturing input.
    Recording {
        /// When recording started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
    /// The engine is replaying a macro.
    Playing {
        /// When playback started.
        started_at: Instant,
        /// Identifies this playback run; completions for other runs are ignored.
        run_id: Uuid,
    },
}

impl SessionPhase {
    /// `true` when neither recording nor playing.
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionPhase::Idle)
    }

    /// `true` while recording.
    pub fn is_recording(&self) -> bool {
        matches!(self, SessionPhase::Recording { .. })
    }

    /// `true` while playing.
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionPhase::Playing { .. })
    }

    /// Whether this phase is the recording session `session_id`.
    pub fn is_session(&self, session_id: Uuid) -> bool {
        matches!(self, SessionPhase::Recording { session_id: current, .. } if *current == session_id)
    }

    /// Whether this phase is the playback run `run_id`.
    pub fn is_run(&self, run_id: Uuid) -> bool {
        matches!(self, SessionPhase::Playing { run_id: current, .. } if *current == run_id)
    }
}
