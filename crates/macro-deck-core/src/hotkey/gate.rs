//! Filters hotkey signals before they reach the session.
//!
//! The gate is long-lived, so it reads the shared [`StateCell`] on every
//! signal instead of remembering what the state was when it was installed.

use crate::{
    hotkey::HotkeySignal,
    model::{MacroEvent, PlaybackSettings},
    session::{SessionState, StateCell, View},
};

use tracing::trace;

/// Session action a hotkey is allowed to trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum GatedAction {
    /// Start a recording.
    StartRecording,
    /// Stop the current recording.
    StopRecording,
    /// Replay a copy of the working buffer.
    StartPlayback {
        /// Events to replay.
        events: Vec<MacroEvent>,
        /// Playback policy at the time of the press.
        settings: PlaybackSettings,
    },
    /// Stop the current playback.
    StopPlayback,
}

/// Hotkey signal filter.
#[derive(Debug, Clone)]
pub struct HotkeyGate {
    state: StateCell,
}

impl HotkeyGate {
    /// Create a gate reading `state`.
    pub fn new(state: StateCell) -> Self {
        Self { state }
    }

    /// Decide what, if anything, `signal` should do right now.
    ///
    /// `None` means the signal is dropped silently.
    pub fn admit(&self, signal: HotkeySignal) -> Option<GatedAction> {
        let action = self.state.read(|state| evaluate(signal, state));
        if action.is_none() {
            trace!(%signal, "Hotkey ignored");
        }
        action
    }
}

/// Gate rules.
///
/// Everything is suppressed in the settings view so composing a binding does
/// not also fire it.
pub fn evaluate(signal: HotkeySignal, state: &SessionState) -> Option<GatedAction> {
    if state.current_view == View::Settings {
        return None;
    }

    let phase = state.phase;
    match signal {
        HotkeySignal::RecordStart if phase.is_idle() => Some(GatedAction::StartRecording),
        HotkeySignal::RecordStop if phase.is_recording() => Some(GatedAction::StopRecording),
        HotkeySignal::PlaybackStart
            if phase.is_idle() && !state.last_recorded_events.is_empty() =>
        {
            Some(GatedAction::StartPlayback {
                events: state.last_recorded_events.clone(),
                settings: state.playback_settings,
            })
        }
        HotkeySignal::PlaybackStop if phase.is_playing() => Some(GatedAction::StopPlayback),
        _ => None,
    }
}
