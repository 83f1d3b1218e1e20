//! Macro Deck: desktop macro recorder with global hotkey control.

mod app;
mod config;
mod console;
mod engine;
mod error;
mod hotkey_listener;
mod shell_command;
#[cfg(test)]
mod tests;
mod window_shell;

pub(crate) use {
    app::App,
    console::Console,
    engine::LocalEngine,
    error::{AppError, Result as AppResult},
    hotkey_listener::HotkeyListener,
    shell_command::{ShellCommand, ShellProxy},
    window_shell::WindowShell,
};

use crate::{
    config::{Config, DEFAULT_LOG_FILTER},
    engine::Store,
};

use macro_deck_core::{EngineSignal, UserCommand, WindowSize};

use std::{sync::Arc, time::Duration};

use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Application entry point.
fn main() {
    let config = Config::load();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            config
                .as_ref()
                .map_or(DEFAULT_LOG_FILTER, |c| c.logging.filter.as_str()),
        )
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let store = match config.data_dir().and_then(Store::open) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open macro store: {:?}", e);
            std::process::exit(1);
        }
    };

    let stored = match store.load_settings() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load stored settings: {:?}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoopBuilder::<ShellCommand>::with_user_event().build();
    let proxy = ShellProxy::new(event_loop.create_proxy());

    // WindowShell lives on the main thread - the window and hotkey manager
    // must stay on the thread running the event loop.
    let mut shell = match WindowShell::new(&event_loop, &config.window) {
        Ok(ws) => ws,
        Err(e) => {
            error!("Failed to create window: {:?}", e);
            std::process::exit(1);
        }
    };

    // Register on the main thread: tao's event loop pumps the Windows
    // messages needed for WM_HOTKEY delivery.
    if let Err(e) = shell.register_hotkeys(&stored.hotkeys) {
        error!(error = ?e, "Failed to register hotkeys, rebind them with `bind`");
    }
    shell.window().set_always_on_top(stored.app.always_on_top);

    let (signal_tx, signal_rx) = mpsc::channel(64);
    let (command_tx, command_rx) = mpsc::channel(32);

    let mut app = Some(App {
        engine: Arc::new(LocalEngine::new(store, proxy, signal_tx.clone())),
        bindings: shell.subscribe_bindings(),
        config,
        signal_tx: signal_tx.clone(),
        signal_rx,
        command_tx: command_tx.clone(),
        command_rx,
    });

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                let Some(app) = app.take() else {
                    return;
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                // Spawn tokio runtime on separate thread.
                // The window and hotkey manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        if let Err(e) = app.run().await {
                            error!(error = ?e, "App error");
                        }
                    });

                    // Blocking forwarders may still be parked in recv().
                    rt.shutdown_timeout(Duration::from_secs(1));
                });
            }
            Event::UserEvent(command) => shell.handle(command, control_flow),
            Event::WindowEvent {
                event: WindowEvent::Resized(physical),
                ..
            } => {
                let logical = physical.to_logical::<f64>(shell.window().scale_factor());
                let size = WindowSize::new(logical.width.round() as u32, logical.height.round() as u32);
                if signal_tx.try_send(EngineSignal::Resize(size)).is_err() {
                    debug!(%size, "Dropped resize, orchestrator busy or gone");
                }
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Window close requested");
                // The app sends Close once it has shut down.
                if command_tx.try_send(UserCommand::Shutdown).is_err() {
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            }
            _ => {}
        }
    });
}
