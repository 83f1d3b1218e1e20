mod controller;
mod debouncer;
mod window_mode;
mod window_policy;

pub use {
    controller::WindowModeController,
    debouncer::ResizeDebouncer,
    window_mode::{WindowMode, WindowSize},
    window_policy::WindowPolicy,
};
