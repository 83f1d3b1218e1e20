use crate::{
    PlaybackSettings, RepeatMode, estimate_duration_ms,
    tests::support::key_events,
};

/// WHAT: Empty sequences take no time
/// WHY: The progress indicator must not divide by a missing last event
#[test]
fn given_no_events_when_estimating_then_zero() {
    // Given: No events
    let settings = PlaybackSettings::default();

    // When: Estimating
    let estimate = estimate_duration_ms(&[], &settings);

    // Then: Zero
    assert_eq!(estimate, 0);
}

/// WHAT: Speed divides the length of a single pass
/// WHY: 2x playback of a 2 second macro should finish in 1 second
#[test]
fn given_double_speed_when_playing_once_then_half_the_recorded_length() {
    // Given: Events spanning 0..2000ms at speed 2
    let events = key_events(5, 500);
    let settings = PlaybackSettings {
        speed: 2.0,
        ..PlaybackSettings::default()
    };

    // When: Estimating
    let estimate = estimate_duration_ms(&events, &settings);

    // Then: 1000ms
    assert_eq!(estimate, 1000);
}

/// WHAT: Fixed repeat counts include the interval between passes only
/// WHY: No pause follows the final pass
#[test]
fn given_three_repeats_with_interval_when_estimating_then_passes_plus_two_gaps() {
    // Given: 1000ms sequence repeated 3 times with 500ms between passes
    let events = key_events(3, 500);
    let settings = PlaybackSettings {
        speed: 1.0,
        repeat: RepeatMode::Count(3),
        interval_ms: 500,
    };

    // When: Estimating
    let estimate = estimate_duration_ms(&events, &settings);

    // Then: 3 * 1000 + 2 * 500
    assert_eq!(estimate, 4000);
}

/// WHAT: Infinite playback reports one pass
/// WHY: The indicator loops over a single pass
#[test]
fn given_infinite_repeat_when_estimating_then_single_pass() {
    // Given: 1500ms sequence on an infinite loop
    let events = key_events(4, 500);
    let settings = PlaybackSettings {
        repeat: RepeatMode::Infinite,
        ..PlaybackSettings::default()
    };

    // When: Estimating
    let estimate = estimate_duration_ms(&events, &settings);

    // Then: One pass
    assert_eq!(estimate, 1500);
}

/// WHAT: The last timestamp is the pass length even when the first is not zero
/// WHY: Recordings often start with idle time before the first event
#[test]
fn given_late_first_event_when_estimating_then_last_timestamp_is_used() {
    // Given: Events at 700ms and 1300ms at half speed
    let mut events = key_events(2, 600);
    for event in &mut events {
        event.timestamp_ms += 700;
    }
    let settings = PlaybackSettings {
        speed: 0.5,
        ..PlaybackSettings::default()
    };

    // When: Estimating
    let estimate = estimate_duration_ms(&events, &settings);

    // Then: 1300 / 0.5
    assert_eq!(estimate, 2600);
}
