use crate::{
    AppError, AppResult, Console, HotkeyListener, LocalEngine, ShellCommand,
    config::Config,
    window_shell::{DEFAULT_TITLE, HotkeyBindings},
};

use macro_deck_core::{
    Banner, EngineSignal, NotificationRouter, Orchestrator, StateCell, UserCommand,
};

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument, warn};

/// How long helper tasks get to stop after the orchestrator returns.
const HELPER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Main application state.
///
/// Runs on the async runtime thread. Window and hotkey changes go back to the
/// main thread through the engine's shell proxy because the window must stay
/// on the UI thread.
pub struct App {
    pub(crate) config: Config,
    pub(crate) engine: Arc<LocalEngine>,
    pub(crate) bindings: watch::Receiver<HotkeyBindings>,
    pub(crate) signal_tx: mpsc::Sender<EngineSignal>,
    pub(crate) signal_rx: mpsc::Receiver<EngineSignal>,
    pub(crate) command_tx: mpsc::Sender<UserCommand>,
    pub(crate) command_rx: mpsc::Receiver<UserCommand>,
}

impl App {
    /// Run until the user quits or the window closes.
    #[instrument(skip(self))]
    pub(crate) async fn run(self) -> AppResult<()> {
        info!("Macro Deck starting");

        let state = StateCell::default();
        let notifier =
            NotificationRouter::new(state.clone(), self.config.notifications.banner_timeout());
        let orchestrator = Orchestrator::new(
            Arc::clone(&self.engine),
            state.clone(),
            notifier.clone(),
            self.config.window.policy(),
        );

        if let Err(e) = orchestrator.session().initialize().await {
            // Engine failures were already shown to the user.
            if !e.is_reported() {
                error!(error = ?e, "Session initialization failed");
            }
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let listener = HotkeyListener::new(self.bindings.clone(), self.signal_tx.clone());
        let listener_shutdown = shutdown_rx.clone();
        let listener_handle = tokio::spawn(async move {
            if let Err(e) = listener.run(listener_shutdown).await {
                error!(error = ?e, "Hotkey listener error");
            }
        });

        let console = Console::new(state.clone(), &notifier, self.command_tx.clone());
        let console_shutdown = shutdown_rx.clone();
        let console_handle = tokio::spawn(async move {
            if let Err(e) = console.run(console_shutdown).await {
                error!(error = ?e, "Console error");
            }
        });

        let title_handle = tokio::spawn(forward_banner(
            Arc::clone(&self.engine),
            notifier.subscribe_banner(),
            shutdown_rx.clone(),
        ));

        // Only producers keep senders, so the channels close when they stop.
        drop(self.signal_tx);
        drop(self.command_tx);

        let result = orchestrator
            .run(self.signal_rx, self.command_rx, shutdown_rx)
            .await;

        if shutdown_tx.send(true).is_err() {
            debug!("No helper tasks listening for shutdown");
        }

        for (name, handle) in [
            ("hotkey listener", listener_handle),
            ("console", console_handle),
            ("title forwarder", title_handle),
        ] {
            join_helper(name, handle).await;
        }

        if let Err(e) = self.engine.shell().send(ShellCommand::Close) {
            warn!(error = ?e, "Window already closed");
        }

        info!("Macro Deck shut down successfully");

        result.map_err(AppError::from)
    }
}

/// Mirror the banner into the window title.
async fn forward_banner(
    engine: Arc<LocalEngine>,
    mut banner_rx: watch::Receiver<Option<Banner>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            changed = banner_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let title = banner_rx
                    .borrow_and_update()
                    .as_ref()
                    .map(|banner| format!("{} | {}", DEFAULT_TITLE, banner.message))
                    .unwrap_or_else(|| DEFAULT_TITLE.to_string());

                if let Err(e) = engine.shell().send(ShellCommand::SetTitle(title)) {
                    warn!(error = ?e, "Failed to update window title");
                    break;
                }
            }
        }
    }
}

async fn join_helper(name: &'static str, handle: JoinHandle<()>) {
    match tokio::time::timeout(HELPER_SHUTDOWN_TIMEOUT, handle).await {
        Ok(Ok(())) => debug!(task = name, "Stopped cleanly"),
        Ok(Err(e)) => error!(task = name, error = ?e, "Task panicked"),
        Err(_) => debug!(
            task = name,
            "Did not stop within timeout, will be cleaned up on exit"
        ),
    }
}
