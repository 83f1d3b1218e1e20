//! Global input capture built on `rdev`.
//!
//! `rdev::listen` blocks its thread forever and cannot be stopped, so a
//! single listener thread is started on the first recording and stays alive,
//! appending to the shared [`Capture`] only while it is active.

use crate::{AppError, AppResult};

use macro_deck_core::{
    EngineSignal, HotkeySettings, MacroEvent, MacroEventKind, MouseButton, RecordingSettings,
};

use std::{
    panic::Location,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use error_location::ErrorLocation;
use rdev::{Button, EventType, Key};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Events collected for the current recording.
#[derive(Debug)]
pub(crate) struct Capture {
    active: bool,
    started_at: Instant,
    settings: RecordingSettings,
    hotkeys: HotkeySettings,
    events: Vec<MacroEvent>,
    cursor: (i32, i32),
    warned: Vec<String>,
}

impl Capture {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            started_at: Instant::now(),
            settings: RecordingSettings::default(),
            hotkeys: HotkeySettings::default(),
            events: Vec::new(),
            cursor: (0, 0),
            warned: Vec::new(),
        }
    }

    pub(crate) fn begin(&mut self, settings: RecordingSettings, hotkeys: HotkeySettings) {
        self.active = true;
        self.started_at = Instant::now();
        self.settings = settings;
        self.hotkeys = hotkeys;
        self.events.clear();
        self.warned.clear();
    }

    /// Stop capturing and return the events, rebased to the first one.
    #[track_caller]
    pub(crate) fn finish(&mut self) -> AppResult<Vec<MacroEvent>> {
        if !self.active {
            return Err(AppError::Capture {
                reason: "No active recording".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.active = false;
        Ok(normalize(std::mem::take(&mut self.events)))
    }

    /// Feed one raw event captured `elapsed_ms` after the recording began.
    ///
    /// Returns a warning when a hotkey was dropped from the capture for the
    /// first time in this recording.
    pub(crate) fn observe(&mut self, event_type: &EventType, elapsed_ms: u64) -> Option<String> {
        if let EventType::MouseMove { x, y } = event_type {
            self.cursor = (*x as i32, *y as i32);
        }

        if !self.active {
            return None;
        }

        let kind = convert(event_type, self.cursor, &self.settings)?;

        if let MacroEventKind::KeyPress { key } | MacroEventKind::KeyRelease { key } = &kind
            && self.hotkeys.is_bound(key)
        {
            // The stop hotkey always ends a recording; reporting it is noise.
            if key.eq_ignore_ascii_case(&self.hotkeys.record_stop)
                || self.warned.iter().any(|warned| warned == key)
            {
                return None;
            }
            self.warned.push(key.clone());
            return Some(format!("Hotkey '{}' detected and ignored", key));
        }

        self.events.push(MacroEvent::new(elapsed_ms, kind));
        None
    }
}

/// `rdev` backed recorder shared by the engine.
pub struct Recorder {
    capture: Arc<Mutex<Capture>>,
    listening: AtomicBool,
    signal_tx: mpsc::Sender<EngineSignal>,
}

impl Recorder {
    /// Create a recorder that reports warnings on `signal_tx`.
    pub fn new(signal_tx: mpsc::Sender<EngineSignal>) -> Self {
        Self {
            capture: Arc::new(Mutex::new(Capture::new())),
            listening: AtomicBool::new(false),
            signal_tx,
        }
    }

    /// Begin a capture. Fails if one is already running.
    #[track_caller]
    #[instrument(skip(self, hotkeys))]
    pub fn start(&self, settings: RecordingSettings, hotkeys: HotkeySettings) -> AppResult<()> {
        {
            let mut capture = self.lock()?;
            if capture.active {
                return Err(AppError::Capture {
                    reason: "Recording already in progress".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            capture.begin(settings, hotkeys);
        }

        self.ensure_listener();
        info!("Capture started");

        Ok(())
    }

    /// End the capture and return what was recorded.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&self) -> AppResult<Vec<MacroEvent>> {
        let events = self.lock()?.finish()?;
        info!(event_count = events.len(), "Capture stopped");
        Ok(events)
    }

    /// Whether a capture is running.
    #[track_caller]
    pub fn is_recording(&self) -> AppResult<bool> {
        Ok(self.lock()?.active)
    }

    #[track_caller]
    fn lock(&self) -> AppResult<MutexGuard<'_, Capture>> {
        self.capture.lock().map_err(|_| AppError::Capture {
            reason: "Capture state lock poisoned".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn ensure_listener(&self) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let capture = Arc::clone(&self.capture);
        let signal_tx = self.signal_tx.clone();

        std::thread::spawn(move || {
            debug!("Input listener thread started");

            let callback = move |event: rdev::Event| {
                let warning = match capture.lock() {
                    Ok(mut capture) => {
                        let elapsed_ms = capture.started_at.elapsed().as_millis() as u64;
                        capture.observe(&event.event_type, elapsed_ms)
                    }
                    Err(_) => None,
                };

                if let Some(warning) = warning
                    && signal_tx
                        .try_send(EngineSignal::RecordingWarning(warning))
                        .is_err()
                {
                    warn!("Dropped recording warning, signal channel full or closed");
                }
            };

            if let Err(e) = rdev::listen(callback) {
                error!(error = ?e, "Input listener failed");
            }
        });
    }
}

/// Translate a raw `rdev` event, honoring the capture filters.
///
/// Clicks are stamped with the last known cursor position since `rdev`
/// button events carry none.
pub(crate) fn convert(
    event_type: &EventType,
    cursor: (i32, i32),
    settings: &RecordingSettings,
) -> Option<MacroEventKind> {
    match event_type {
        EventType::MouseMove { x, y } if settings.capture_mouse_move => {
            Some(MacroEventKind::MouseMove {
                x: *x as i32,
                y: *y as i32,
            })
        }
        EventType::ButtonPress(button) | EventType::ButtonRelease(button)
            if settings.capture_mouse_clicks =>
        {
            Some(MacroEventKind::MouseClick {
                x: cursor.0,
                y: cursor.1,
                button: mouse_button(*button)?,
                pressed: matches!(event_type, EventType::ButtonPress(_)),
            })
        }
        EventType::Wheel { delta_x, delta_y } if settings.capture_mouse_clicks => {
            Some(MacroEventKind::MouseWheel {
                delta_x: *delta_x,
                delta_y: *delta_y,
            })
        }
        EventType::KeyPress(key) if settings.capture_keyboard => {
            Some(MacroEventKind::KeyPress { key: key_name(*key) })
        }
        EventType::KeyRelease(key) if settings.capture_keyboard => {
            Some(MacroEventKind::KeyRelease { key: key_name(*key) })
        }
        _ => None,
    }
}

/// Rebase timestamps so the first event is at zero.
pub(crate) fn normalize(mut events: Vec<MacroEvent>) -> Vec<MacroEvent> {
    if let Some(start) = events.first().map(|e| e.timestamp_ms) {
        for event in &mut events {
            event.timestamp_ms = event.timestamp_ms.saturating_sub(start);
        }
    }
    events
}

fn mouse_button(button: Button) -> Option<MouseButton> {
    match button {
        Button::Left => Some(MouseButton::Left),
        Button::Right => Some(MouseButton::Right),
        Button::Middle => Some(MouseButton::Middle),
        Button::Unknown(_) => None,
    }
}

/// Stable name for a key; the player maps these back to keystrokes.
pub(crate) fn key_name(key: Key) -> String {
    let name = match key {
        Key::KeyA => "a",
        Key::KeyB => "b",
        Key::KeyC => "c",
        Key::KeyD => "d",
        Key::KeyE => "e",
        Key::KeyF => "f",
        Key::KeyG => "g",
        Key::KeyH => "h",
        Key::KeyI => "i",
        Key::KeyJ => "j",
        Key::KeyK => "k",
        Key::KeyL => "l",
        Key::KeyM => "m",
        Key::KeyN => "n",
        Key::KeyO => "o",
        Key::KeyP => "p",
        Key::KeyQ => "q",
        Key::KeyR => "r",
        Key::KeyS => "s",
        Key::KeyT => "t",
        Key::KeyU => "u",
        Key::KeyV => "v",
        Key::KeyW => "w",
        Key::KeyX => "x",
        Key::KeyY => "y",
        Key::KeyZ => "z",
        Key::Num0 => "0",
        Key::Num1 => "1",
        Key::Num2 => "2",
        Key::Num3 => "3",
        Key::Num4 => "4",
        Key::Num5 => "5",
        Key::Num6 => "6",
        Key::Num7 => "7",
        Key::Num8 => "8",
        Key::Num9 => "9",
        Key::Return => "Enter",
        Key::Space => "Space",
        Key::Backspace => "Backspace",
        Key::Tab => "Tab",
        Key::Escape => "Escape",
        Key::ShiftLeft | Key::ShiftRight => "Shift",
        Key::ControlLeft | Key::ControlRight => "Control",
        Key::Alt | Key::AltGr => "Alt",
        Key::MetaLeft | Key::MetaRight => "Meta",
        other => return format!("{:?}", other),
    };
    name.to_string()
}
