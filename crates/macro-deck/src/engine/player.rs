//! Macro replay on a blocking thread.
//!
//! Timing, speed and repeat policy live here; the simulated input goes
//! through an [`InputSink`] so the scheduling can be exercised without a
//! desktop session.

use crate::{
    AppError, AppResult,
    engine::input_guard::{InputGuard, InputSink},
};

use macro_deck_core::{Macro, MacroEvent, PlaybackSettings, RepeatMode};

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use tracing::{debug, info, instrument, warn};

/// Granularity of cancellable sleeps.
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// How a playback run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Every pass ran to the end.
    Completed {
        /// Passes played.
        passes: u32,
    },
    /// The run was cancelled.
    Cancelled {
        /// Passes fully played before cancellation.
        passes: u32,
    },
}

/// Plays macros, one run at a time.
pub struct Player {
    cancel: Mutex<Arc<AtomicBool>>,
}

impl Player {
    /// Create a player with no run in progress.
    pub fn new() -> Self {
        Self {
            cancel: Mutex::new(Arc::new(AtomicBool::new(false))),
        }
    }

    /// Replay `macro_data` and resolve when it finishes or is cancelled.
    ///
    /// Starting a new run cancels the previous one.
    #[instrument(skip(self, macro_data), fields(macro_id = %macro_data.id))]
    pub async fn play(&self, macro_data: Macro) -> AppResult<PlayOutcome> {
        let cancel = self.next_run();

        // Enigo is not Send, so the guard is created on the blocking thread.
        let outcome = tokio::task::spawn_blocking(move || {
            let mut guard = InputGuard::new()?;
            run(
                &mut guard,
                &macro_data.events,
                &macro_data.playback_settings,
                &cancel,
            )
        })
        .await
        .map_err(|e| AppError::playback(format!("Playback task panicked: {}", e)))??;

        info!(?outcome, "Playback finished");

        Ok(outcome)
    }

    /// Ask the current run to stop at the next event boundary.
    pub fn cancel(&self) {
        match self.cancel.lock() {
            Ok(cancel) => cancel.store(true, Ordering::SeqCst),
            Err(_) => warn!("Playback cancel flag lock poisoned"),
        }
    }

    fn next_run(&self) -> Arc<AtomicBool> {
        let next = Arc::new(AtomicBool::new(false));
        match self.cancel.lock() {
            Ok(mut current) => {
                current.store(true, Ordering::SeqCst);
                *current = Arc::clone(&next);
            }
            Err(_) => warn!("Playback cancel flag lock poisoned"),
        }
        next
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Play `events` into `sink` following `settings` until done or cancelled.
pub(crate) fn run<S: InputSink>(
    sink: &mut S,
    events: &[MacroEvent],
    settings: &PlaybackSettings,
    cancel: &AtomicBool,
) -> AppResult<PlayOutcome> {
    if events.is_empty() {
        return Ok(PlayOutcome::Completed { passes: 0 });
    }

    let total = pass_count(settings.repeat);
    let mut passes = 0u32;

    while total.is_none_or(|total| passes < total) {
        if passes > 0 && sleep_unless_cancelled(Duration::from_millis(settings.interval_ms), cancel) {
            return Ok(PlayOutcome::Cancelled { passes });
        }

        debug!(pass = passes + 1, "Playing pass");

        let mut previous = events[0].timestamp_ms;
        for event in events {
            let delay = scaled_delay(previous, event.timestamp_ms, settings.speed);
            previous = event.timestamp_ms;

            if sleep_unless_cancelled(delay, cancel) {
                return Ok(PlayOutcome::Cancelled { passes });
            }
            sink.apply(&event.kind)?;
        }

        passes = passes.saturating_add(1);
    }

    Ok(PlayOutcome::Completed { passes })
}

/// Number of passes, `None` for infinite.
pub(crate) fn pass_count(repeat: RepeatMode) -> Option<u32> {
    match repeat {
        RepeatMode::Once => Some(1),
        RepeatMode::Count(count) => Some(count),
        RepeatMode::Infinite => None,
    }
}

/// Gap between two recorded timestamps at the given speed.
pub(crate) fn scaled_delay(previous_ms: u64, next_ms: u64, speed: f64) -> Duration {
    let gap = next_ms.saturating_sub(previous_ms) as f64;
    if speed <= 0.0 {
        return Duration::from_millis(gap as u64);
    }
    Duration::from_secs_f64(gap / speed / 1000.0)
}

/// Sleep for `duration`, waking early on cancellation. Returns `true` if cancelled.
fn sleep_unless_cancelled(duration: Duration, cancel: &AtomicBool) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if cancel.load(Ordering::SeqCst) {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep(CANCEL_POLL.min(deadline - now));
    }
}
