use crate::{AppError, AppResult};

use macro_deck_core::{HotkeySettings, WindowSize};

use std::{panic::Location, sync::Mutex};

use error_location::ErrorLocation;
use tao::event_loop::EventLoopProxy;
use tokio::sync::oneshot;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns the window and the hotkey manager, so every window
/// mutation, hotkey registration and process lifecycle event flows through
/// this enum.
#[derive(Debug)]
pub enum ShellCommand {
    /// Resize the window to a logical size.
    SetWindowSize(WindowSize),
    /// Pin or unpin the window above other windows.
    SetAlwaysOnTop(bool),
    /// Replace the window title. Used as the mini-mode banner.
    SetTitle(String),
    /// Minimize the window.
    Minimize,
    /// Maximize the window.
    Maximize,
    /// Replace the registered global hotkeys.
    RegisterHotkeys {
        /// New bindings.
        hotkeys: HotkeySettings,
        /// Registration outcome.
        reply: oneshot::Sender<AppResult<()>>,
    },
    /// Close the window and exit the event loop.
    Close,
}

/// Sendable handle for posting [`ShellCommand`]s to the event loop.
///
/// `EventLoopProxy` is `Send` but not `Sync` on every platform, so it sits
/// behind a mutex to let the engine be shared across tasks.
pub struct ShellProxy {
    proxy: Mutex<EventLoopProxy<ShellCommand>>,
}

impl ShellProxy {
    /// Wrap an event loop proxy.
    pub fn new(proxy: EventLoopProxy<ShellCommand>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
        }
    }

    /// Post a command to the main thread.
    #[track_caller]
    pub fn send(&self, command: ShellCommand) -> AppResult<()> {
        let proxy = self.proxy.lock().map_err(|_| AppError::ChannelSendFailed {
            message: "Event loop proxy lock poisoned".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        proxy
            .send_event(command)
            .map_err(|_| AppError::ChannelSendFailed {
                message: "Event loop closed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
