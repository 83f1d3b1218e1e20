use crate::session::{SessionPhase, StateCell};

use tracing::debug;
use uuid::Uuid;

/// Return the session to idle if `run_id` is the active playback run.
///
/// Completions for a run that was stopped, or superseded by a newer run,
/// leave the state untouched.
pub(crate) fn release_run(state: &StateCell, run_id: Uuid) -> bool {
    let released = state.update_if(|state| {
        if !state.phase.is_run(run_id) {
            return false;
        }
        state.phase = SessionPhase::Idle;
        true
    });

    if released {
        debug!(run_id = %run_id, "Playback run released");
    }

    released
}

/// RAII guard that returns the session to idle when a playback run ends.
///
/// Dropped after the engine request resolves, fails, or the awaiting task
/// is cancelled, so the session can never stay stuck in playing.
pub(crate) struct PlaybackGuard {
    state: StateCell,
    run_id: Uuid,
}

impl PlaybackGuard {
    pub(crate) fn new(state: StateCell, run_id: Uuid) -> Self {
        Self { state, run_id }
    }

    /// Whether this guard's run is still the active one.
    pub(crate) fn is_current(&self) -> bool {
        self.state.read(|state| state.phase.is_run(self.run_id))
    }
}

impl Drop for PlaybackGuard {
    fn drop(&mut self) {
        release_run(&self.state, self.run_id);
    }
}
