#![allow(clippy::unwrap_used)]

use crate::{
    AppError,
    engine::{
        Recorder,
        recorder::{Capture, key_name, normalize},
    },
    tests::support::key_events,
};

use macro_deck_core::{HotkeySettings, MacroEvent, MacroEventKind, MouseButton, RecordingSettings};

use rdev::{Button, EventType, Key};
use tokio::sync::mpsc;

fn started(settings: RecordingSettings) -> Capture {
    let mut capture = Capture::new();
    capture.begin(settings, HotkeySettings::default());
    capture
}

/// WHAT: Nothing is kept while no recording is active
/// WHY: The listener thread outlives every recording
#[test]
fn given_inactive_capture_when_observing_then_nothing_recorded() {
    // Given: A capture that was never started, then started
    let mut capture = Capture::new();
    capture.observe(&EventType::KeyPress(Key::KeyA), 5);
    capture.begin(RecordingSettings::default(), HotkeySettings::default());

    // When: Finishing
    let events = capture.finish().unwrap();

    // Then: Empty
    assert!(events.is_empty());
}

/// WHAT: Clicks carry the last cursor position, even one seen before recording
/// WHY: Button events have no coordinates of their own
#[test]
fn given_cursor_moved_before_start_when_clicking_then_click_at_cursor() {
    // Given: Cursor moved while idle, then a recording without move capture
    let mut capture = Capture::new();
    capture.observe(&EventType::MouseMove { x: 40.0, y: 75.0 }, 0);
    capture.begin(
        RecordingSettings {
            capture_mouse_move: false,
            ..RecordingSettings::default()
        },
        HotkeySettings::default(),
    );

    // When: Pressing and releasing the left button
    capture.observe(&EventType::ButtonPress(Button::Left), 10);
    capture.observe(&EventType::ButtonRelease(Button::Left), 30);
    let events = capture.finish().unwrap();

    // Then: Two clicks at the cursor, rebased to the first
    assert_eq!(
        events,
        vec![
            MacroEvent::new(
                0,
                MacroEventKind::MouseClick {
                    x: 40,
                    y: 75,
                    button: MouseButton::Left,
                    pressed: true,
                }
            ),
            MacroEvent::new(
                20,
                MacroEventKind::MouseClick {
                    x: 40,
                    y: 75,
                    button: MouseButton::Left,
                    pressed: false,
                }
            ),
        ]
    );
}

/// WHAT: Disabled sources are filtered out
/// WHY: Recording settings decide what ends up in the macro
#[test]
fn given_keyboard_disabled_when_typing_and_scrolling_then_only_wheel_kept() {
    // Given: Keyboard capture off
    let mut capture = started(RecordingSettings {
        capture_keyboard: false,
        ..RecordingSettings::default()
    });

    // When: Typing and scrolling
    capture.observe(&EventType::KeyPress(Key::KeyA), 0);
    capture.observe(&EventType::KeyRelease(Key::KeyA), 5);
    capture.observe(
        &EventType::Wheel {
            delta_x: 0,
            delta_y: -3,
        },
        10,
    );
    let events = capture.finish().unwrap();

    // Then: Only the wheel event
    assert_eq!(
        events,
        vec![MacroEvent::new(
            0,
            MacroEventKind::MouseWheel {
                delta_x: 0,
                delta_y: -3,
            }
        )]
    );
}

/// WHAT: Hotkey presses are dropped and reported once
/// WHY: Replaying a hotkey would restart recording or playback
#[test]
fn given_bound_key_when_pressed_twice_then_dropped_and_warned_once() {
    // Given: Default bindings, recording
    let mut capture = started(RecordingSettings::default());

    // When: Pressing the playback start key twice
    let first = capture.observe(&EventType::KeyPress(Key::F11), 0);
    let release = capture.observe(&EventType::KeyRelease(Key::F11), 5);
    let second = capture.observe(&EventType::KeyPress(Key::F11), 10);
    let events = capture.finish().unwrap();

    // Then: One warning, nothing recorded
    assert_eq!(first.as_deref(), Some("Hotkey 'F11' detected and ignored"));
    assert_eq!(release, None);
    assert_eq!(second, None);
    assert!(events.is_empty());
}

/// WHAT: The stop hotkey is dropped silently
/// WHY: Every recording ends with it, so a warning would always fire
#[test]
fn given_record_stop_key_when_pressed_then_dropped_without_warning() {
    let mut capture = started(RecordingSettings::default());

    let warning = capture.observe(&EventType::KeyPress(Key::F10), 0);
    let events = capture.finish().unwrap();

    assert_eq!(warning, None);
    assert!(events.is_empty());
}

/// WHAT: Finishing twice fails the second time
/// WHY: Stop without a running capture is an engine error
#[test]
fn given_finished_capture_when_finishing_again_then_capture_error() {
    let mut capture = started(RecordingSettings::default());
    capture.finish().unwrap();

    assert!(matches!(capture.finish(), Err(AppError::Capture { .. })));
}

/// WHAT: Normalization rebases to the first event
/// WHY: The delay before the first input is not part of the macro
#[test]
fn given_offset_events_when_normalizing_then_first_at_zero() {
    let shifted: Vec<MacroEvent> = key_events(3, 50)
        .into_iter()
        .map(|mut e| {
            e.timestamp_ms += 1200;
            e
        })
        .collect();

    assert_eq!(normalize(shifted), key_events(3, 50));
    assert!(normalize(Vec::new()).is_empty());
}

/// WHAT: Keys get short stable names
/// WHY: Hotkey filtering and playback both match on these names
#[test]
fn given_keys_when_naming_then_stable_names() {
    assert_eq!(key_name(Key::KeyQ), "q");
    assert_eq!(key_name(Key::Num7), "7");
    assert_eq!(key_name(Key::Return), "Enter");
    assert_eq!(key_name(Key::ShiftRight), "Shift");
    assert_eq!(key_name(Key::F9), "F9");
}

/// WHAT: Stop without start is rejected by the recorder
/// WHY: Startup queries and stray stops must not spawn the listener
#[test]
fn given_new_recorder_when_stopping_then_error_and_not_recording() {
    let (signal_tx, _signal_rx) = mpsc::channel(4);
    let recorder = Recorder::new(signal_tx);

    assert!(!recorder.is_recording().unwrap());
    assert!(recorder.stop().is_err());
}
