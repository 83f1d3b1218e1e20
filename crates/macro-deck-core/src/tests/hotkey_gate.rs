use crate::{
    GatedAction, HotkeyGate, HotkeySignal, PlaybackSettings, SessionPhase, SessionState,
    StateCell, View, evaluate_hotkey, tests::support::key_events,
};

use std::time::Instant;

use uuid::Uuid;

fn recording() -> SessionPhase {
    SessionPhase::Recording {
        started_at: Instant::now(),
        session_id: Uuid::new_v4(),
    }
}

fn playing() -> SessionPhase {
    SessionPhase::Playing {
        started_at: Instant::now(),
        run_id: Uuid::new_v4(),
    }
}

/// WHAT: Every hotkey is suppressed in the settings view
/// WHY: Pressing a key to rebind it must not also trigger it
#[test]
fn given_settings_view_when_any_hotkey_then_suppressed() {
    for phase in [SessionPhase::Idle, recording(), playing()] {
        // Given: Settings view with a non-empty buffer
        let state = SessionState {
            phase,
            current_view: View::Settings,
            last_recorded_events: key_events(2, 10),
            ..SessionState::default()
        };

        for signal in HotkeySignal::ALL {
            // When: Evaluating
            let action = evaluate_hotkey(signal, &state);

            // Then: Dropped
            assert_eq!(action, None, "{signal} admitted in settings view");
        }
    }
}

/// WHAT: Record start only fires while idle
/// WHY: Starting a capture during playback would record the simulated input
#[test]
fn given_phases_when_record_start_then_only_idle_admitted() {
    let idle = SessionState::default();
    let busy = SessionState {
        phase: playing(),
        ..SessionState::default()
    };

    assert_eq!(
        evaluate_hotkey(HotkeySignal::RecordStart, &idle),
        Some(GatedAction::StartRecording)
    );
    assert_eq!(evaluate_hotkey(HotkeySignal::RecordStart, &busy), None);
}

/// WHAT: Record stop only fires while recording
/// WHY: Stray stop presses are harmless
#[test]
fn given_phases_when_record_stop_then_only_recording_admitted() {
    let idle = SessionState::default();
    let capturing = SessionState {
        phase: recording(),
        current_view: View::Library,
        ..SessionState::default()
    };

    assert_eq!(evaluate_hotkey(HotkeySignal::RecordStop, &idle), None);
    assert_eq!(
        evaluate_hotkey(HotkeySignal::RecordStop, &capturing),
        Some(GatedAction::StopRecording)
    );
}

/// WHAT: Playback start replays the working buffer with the session's settings
/// WHY: The hotkey has no selection context; the buffer is what the user just recorded
#[test]
fn given_idle_with_buffer_when_playback_start_then_buffer_copy_admitted() {
    // Given: Idle with three buffered events and 2x speed
    let settings = PlaybackSettings {
        speed: 2.0,
        ..PlaybackSettings::default()
    };
    let state = SessionState {
        last_recorded_events: key_events(3, 10),
        playback_settings: settings,
        ..SessionState::default()
    };

    // When: Evaluating
    let action = evaluate_hotkey(HotkeySignal::PlaybackStart, &state);

    // Then: Playback of a copy of the buffer
    assert_eq!(
        action,
        Some(GatedAction::StartPlayback {
            events: key_events(3, 10),
            settings,
        })
    );
}

/// WHAT: Playback start with an empty buffer is ignored
/// WHY: There is nothing to replay
#[test]
fn given_empty_buffer_when_playback_start_then_ignored() {
    let state = SessionState::default();

    assert_eq!(evaluate_hotkey(HotkeySignal::PlaybackStart, &state), None);
}

/// WHAT: Playback stop only fires while playing
/// WHY: Stray stop presses are harmless
#[test]
fn given_phases_when_playback_stop_then_only_playing_admitted() {
    let idle = SessionState::default();
    let replaying = SessionState {
        phase: playing(),
        ..SessionState::default()
    };

    assert_eq!(evaluate_hotkey(HotkeySignal::PlaybackStop, &idle), None);
    assert_eq!(
        evaluate_hotkey(HotkeySignal::PlaybackStop, &replaying),
        Some(GatedAction::StopPlayback)
    );
}

/// WHAT: The gate sees state changes made after it was created
/// WHY: A gate holding a stale copy would keep filtering on the startup view
#[test]
fn given_gate_created_earlier_when_view_changes_then_latest_view_applies() {
    // Given: Gate created while in the recorder view
    let state = StateCell::default();
    let gate = HotkeyGate::new(state.clone());
    assert_eq!(
        gate.admit(HotkeySignal::RecordStart),
        Some(GatedAction::StartRecording)
    );

    // When: Switching to the settings view
    state.update(|s| s.current_view = View::Settings);

    // Then: Suppressed
    assert_eq!(gate.admit(HotkeySignal::RecordStart), None);
}
