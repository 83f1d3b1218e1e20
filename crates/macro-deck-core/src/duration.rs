//! Expected playback length of an event sequence.

use crate::model::{MacroEvent, PlaybackSettings, RepeatMode};

/// Estimate how long playing `events` with `settings` takes, in milliseconds.
///
/// One pass lasts `last.timestamp_ms / speed`. A fixed repeat count adds the
/// interval between passes; infinite playback reports a single pass so the
/// value can drive a looping progress animation.
pub fn estimate_duration_ms(events: &[MacroEvent], settings: &PlaybackSettings) -> u64 {
    let Some(last) = events.last() else {
        return 0;
    };

    let base = last.timestamp_ms as f64 / settings.speed;

    let total = match settings.repeat {
        RepeatMode::Count(count) if count > 0 => {
            let count = f64::from(count);
            base * count + settings.interval_ms as f64 * (count - 1.0)
        }
        RepeatMode::Count(_) | RepeatMode::Once | RepeatMode::Infinite => base,
    };

    total.round() as u64
}
