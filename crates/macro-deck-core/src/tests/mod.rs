mod duration;
mod hotkey_gate;
mod support;
