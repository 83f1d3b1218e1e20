use crate::{AppError, AppResult};

use macro_deck_core::{MacroEventKind, MouseButton};

use std::panic::Location;

use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use error_location::ErrorLocation;
use tracing::debug;

/// Destination for simulated input.
pub trait InputSink {
    /// Simulate one event.
    fn apply(&mut self, kind: &MacroEventKind) -> AppResult<()>;
}

/// RAII guard that simulates input and releases anything still held when dropped.
///
/// A macro cancelled between a press and its release would otherwise leave a
/// key or mouse button stuck down. Release on drop is best effort: if it
/// fails, the OS resets the state on the next physical press.
pub struct InputGuard {
    enigo: Enigo,
    held_keys: Vec<Key>,
    held_buttons: Vec<Button>,
}

impl InputGuard {
    /// Connect to the platform input system.
    #[track_caller]
    pub(crate) fn new() -> AppResult<Self> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| AppError::Playback {
            reason: format!("Failed to create Enigo: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            enigo,
            held_keys: Vec::new(),
            held_buttons: Vec::new(),
        })
    }

    #[track_caller]
    fn key(&mut self, name: &str, direction: Direction) -> AppResult<()> {
        let Some(key) = enigo_key(name) else {
            debug!(key = name, "Skipping key with no simulated equivalent");
            return Ok(());
        };

        self.enigo
            .key(key, direction)
            .map_err(|e| AppError::playback(format!("Failed to simulate key {}: {}", name, e)))?;

        match direction {
            Direction::Press => self.held_keys.push(key),
            _ => self.held_keys.retain(|held| *held != key),
        }

        Ok(())
    }
}

impl InputSink for InputGuard {
    fn apply(&mut self, kind: &MacroEventKind) -> AppResult<()> {
        match kind {
            MacroEventKind::MouseMove { x, y } => self
                .enigo
                .move_mouse(*x, *y, Coordinate::Abs)
                .map_err(|e| AppError::playback(format!("Mouse move failed: {}", e))),
            MacroEventKind::MouseClick {
                x,
                y,
                button,
                pressed,
            } => {
                let button = enigo_button(*button);
                let direction = if *pressed {
                    Direction::Press
                } else {
                    Direction::Release
                };

                self.enigo
                    .move_mouse(*x, *y, Coordinate::Abs)
                    .map_err(|e| AppError::playback(format!("Mouse move failed: {}", e)))?;
                self.enigo
                    .button(button, direction)
                    .map_err(|e| AppError::playback(format!("Mouse button failed: {}", e)))?;

                if *pressed {
                    self.held_buttons.push(button);
                } else {
                    self.held_buttons.retain(|held| *held != button);
                }
                Ok(())
            }
            MacroEventKind::KeyPress { key } => self.key(key, Direction::Press),
            MacroEventKind::KeyRelease { key } => self.key(key, Direction::Release),
            MacroEventKind::MouseWheel { delta_x, delta_y } => {
                if *delta_y != 0 {
                    self.enigo
                        .scroll(clamp_scroll(*delta_y), Axis::Vertical)
                        .map_err(|e| AppError::playback(format!("Scroll failed: {}", e)))?;
                }
                if *delta_x != 0 {
                    self.enigo
                        .scroll(clamp_scroll(*delta_x), Axis::Horizontal)
                        .map_err(|e| AppError::playback(format!("Scroll failed: {}", e)))?;
                }
                Ok(())
            }
        }
    }
}

impl Drop for InputGuard {
    fn drop(&mut self) {
        for key in self.held_keys.drain(..) {
            let _ = self.enigo.key(key, Direction::Release);
        }
        for button in self.held_buttons.drain(..) {
            let _ = self.enigo.button(button, Direction::Release);
        }
    }
}

fn clamp_scroll(delta: i64) -> i32 {
    delta.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn enigo_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        MouseButton::Middle => Button::Middle,
    }
}

/// Map a recorded key name back to a simulated key.
pub(crate) fn enigo_key(name: &str) -> Option<Key> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(Key::Unicode(c));
    }

    let key = match name {
        "Enter" => Key::Return,
        "Space" => Key::Space,
        "Backspace" => Key::Backspace,
        "Tab" => Key::Tab,
        "Escape" => Key::Escape,
        "Shift" => Key::Shift,
        "Control" => Key::Control,
        "Alt" => Key::Alt,
        "Meta" => Key::Meta,
        "CapsLock" => Key::CapsLock,
        "Delete" => Key::Delete,
        "Home" => Key::Home,
        "End" => Key::End,
        "PageUp" => Key::PageUp,
        "PageDown" => Key::PageDown,
        "UpArrow" => Key::UpArrow,
        "DownArrow" => Key::DownArrow,
        "LeftArrow" => Key::LeftArrow,
        "RightArrow" => Key::RightArrow,
        "F1" => Key::F1,
        "F2" => Key::F2,
        "F3" => Key::F3,
        "F4" => Key::F4,
        "F5" => Key::F5,
        "F6" => Key::F6,
        "F7" => Key::F7,
        "F8" => Key::F8,
        "F9" => Key::F9,
        "F10" => Key::F10,
        "F11" => Key::F11,
        "F12" => Key::F12,
        _ => return None,
    };
    Some(key)
}
