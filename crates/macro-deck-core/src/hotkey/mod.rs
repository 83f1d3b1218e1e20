mod gate;
mod hotkey_signal;

pub use {
    gate::{GatedAction, HotkeyGate, evaluate},
    hotkey_signal::HotkeySignal,
};
