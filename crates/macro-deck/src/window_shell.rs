//! Main-thread owner of the window and the global hotkey registrations.
//!
//! Both the `tao` window and `GlobalHotKeyManager` must stay on the thread
//! running the event loop, so the async runtime reaches them only through
//! [`ShellCommand`]s.

use crate::{AppError, AppResult, ShellCommand, config::WindowConfig};

use macro_deck_core::{HotkeySettings, HotkeySignal, WindowSize};

use std::{collections::HashMap, panic::Location, str::FromStr};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyManager, hotkey::HotKey};
use tao::{
    dpi::LogicalSize,
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Title shown when no banner is active.
pub(crate) const DEFAULT_TITLE: &str = "Macro Deck";

/// Registered hotkey id to the signal it fires.
pub(crate) type HotkeyBindings = HashMap<u32, HotkeySignal>;

/// Window and hotkey owner.
pub struct WindowShell {
    window: Window,
    hotkey_manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
    bindings_tx: watch::Sender<HotkeyBindings>,
}

impl WindowShell {
    /// Create the window at the normal size.
    #[track_caller]
    #[instrument(skip(event_loop))]
    pub fn new(event_loop: &EventLoop<ShellCommand>, config: &WindowConfig) -> AppResult<Self> {
        let window = WindowBuilder::new()
            .with_title(DEFAULT_TITLE)
            .with_inner_size(logical(config.normal_size))
            .build(event_loop)
            .map_err(|e| AppError::Config {
                reason: format!("Failed to create window: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let hotkey_manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let (bindings_tx, _bindings_rx) = watch::channel(HotkeyBindings::new());

        info!(size = %config.normal_size, "Window created");

        Ok(Self {
            window,
            hotkey_manager,
            registered: Vec::new(),
            bindings_tx,
        })
    }

    /// Window the shell owns.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Subscribe to the current hotkey bindings.
    pub fn subscribe_bindings(&self) -> watch::Receiver<HotkeyBindings> {
        self.bindings_tx.subscribe()
    }

    /// Replace all registered hotkeys.
    ///
    /// Must be called on the event loop thread so that `WM_HOTKEY` messages
    /// are dispatched on Windows. On failure the previous bindings stay
    /// registered.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn register_hotkeys(&mut self, hotkeys: &HotkeySettings) -> AppResult<()> {
        let parsed = parse_bindings(hotkeys)?;
        let next: Vec<HotKey> = parsed.iter().map(|(hotkey, _)| *hotkey).collect();

        if !self.registered.is_empty() {
            self.hotkey_manager
                .unregister_all(&self.registered)
                .map_err(|e| AppError::HotkeyRegistrationFailed {
                    reason: format!("Failed to unregister previous hotkeys: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        if let Err(e) = self.hotkey_manager.register_all(&next) {
            if let Err(restore) = self.hotkey_manager.register_all(&self.registered) {
                warn!(error = %restore, "Failed to restore previous hotkeys");
            }
            return Err(AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register hotkeys: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.registered = next;
        self.bindings_tx.send_replace(
            parsed
                .into_iter()
                .map(|(hotkey, signal)| (hotkey.id(), signal))
                .collect(),
        );

        info!(
            record_start = %hotkeys.record_start,
            record_stop = %hotkeys.record_stop,
            playback_start = %hotkeys.playback_start,
            playback_stop = %hotkeys.playback_stop,
            "Global hotkeys registered"
        );

        Ok(())
    }

    /// Apply a command from the async runtime.
    pub fn handle(&mut self, command: ShellCommand, control_flow: &mut ControlFlow) {
        match command {
            ShellCommand::SetWindowSize(size) => {
                debug!(%size, "Resizing window");
                self.window.set_inner_size(logical(size));
            }
            ShellCommand::SetAlwaysOnTop(always_on_top) => {
                debug!(always_on_top, "Setting always-on-top");
                self.window.set_always_on_top(always_on_top);
            }
            ShellCommand::SetTitle(title) => self.window.set_title(&title),
            ShellCommand::Minimize => self.window.set_minimized(true),
            ShellCommand::Maximize => self.window.set_maximized(true),
            ShellCommand::RegisterHotkeys { hotkeys, reply } => {
                let result = self.register_hotkeys(&hotkeys);
                if reply.send(result).is_err() {
                    warn!("Hotkey registration requester went away");
                }
            }
            ShellCommand::Close => {
                info!("Close requested");
                *control_flow = ControlFlow::ExitWithCode(0);
            }
        }
    }
}

/// Parse every binding into a `global-hotkey` accelerator.
#[track_caller]
pub(crate) fn parse_bindings(hotkeys: &HotkeySettings) -> AppResult<Vec<(HotKey, HotkeySignal)>> {
    let mut parsed: Vec<(HotKey, HotkeySignal)> = Vec::with_capacity(HotkeySignal::ALL.len());

    for (binding, signal) in hotkeys.bindings().into_iter().zip(HotkeySignal::ALL) {
        let hotkey = HotKey::from_str(binding).map_err(|e| AppError::HotkeyRegistrationFailed {
            reason: format!("Invalid binding '{}' for {}: {}", binding, signal, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if parsed.iter().any(|(existing, _)| existing.id() == hotkey.id()) {
            return Err(AppError::HotkeyRegistrationFailed {
                reason: format!("Binding '{}' is used more than once", binding),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        parsed.push((hotkey, signal));
    }

    Ok(parsed)
}

fn logical(size: WindowSize) -> LogicalSize<f64> {
    LogicalSize::new(f64::from(size.width), f64::from(size.height))
}
