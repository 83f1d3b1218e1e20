use crate::{
    model::{HotkeySettings, MacroEvent, MacroId, PlaybackSettings, RecordingSettings},
    session::{MacroLibrary, SessionPhase, View},
    window::WindowMode,
};

use std::sync::Arc;

use tokio::sync::watch;

/// The orchestrator's in-memory view of the running process.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Idle, recording or playing.
    pub phase: SessionPhase,
    /// Active screen.
    pub current_view: View,
    /// Normal or compact window layout.
    pub window_mode: WindowMode,
    /// Selected macro; always present in `library` when set.
    pub selected_macro_id: Option<MacroId>,
    /// Events returned by the last recording.
    pub last_recorded_events: Vec<MacroEvent>,
    /// Saved macros in display order.
    pub library: MacroLibrary,
    /// Capture filters for the next recording.
    pub recording_settings: RecordingSettings,
    /// Playback policy for the working buffer.
    pub playback_settings: PlaybackSettings,
    /// Hotkeys as last accepted by the engine.
    pub hotkeys: HotkeySettings,
}

impl SessionState {
    /// `true` while recording.
    pub fn is_recording(&self) -> bool {
        self.phase.is_recording()
    }

    /// `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    /// `true` in the compact layout.
    pub fn is_mini_mode(&self) -> bool {
        self.window_mode == WindowMode::Mini
    }
}

/// Shared, immediately-synchronized session state.
///
/// Long-lived listeners (hotkey gate, resize debouncer, notifier) hold a
/// clone of the cell and read it on every event. Writes are short synchronous
/// closures and are never held across an `.await`.
#[derive(Debug, Clone)]
pub struct StateCell {
    tx: Arc<watch::Sender<SessionState>>,
}

impl StateCell {
    /// Create a cell holding `initial`.
    pub fn new(initial: SessionState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Read the latest state.
    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Clone the latest state.
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Mutate the state and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.tx.send_modify(f);
    }

    /// Mutate the state; subscribers are notified only if `f` returns `true`.
    ///
    /// Returns what `f` returned, which makes check-and-set transitions atomic.
    pub fn update_if(&self, f: impl FnOnce(&mut SessionState) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Current session phase.
    pub fn phase(&self) -> SessionPhase {
        self.read(|state| state.phase)
    }

    /// Current window mode.
    pub fn window_mode(&self) -> WindowMode {
        self.read(|state| state.window_mode)
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new(SessionState::default())
    }
}
