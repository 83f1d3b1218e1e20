//! Forwards global hotkey presses into the orchestrator.
//!
//! Registration happens on the main thread in [`WindowShell`]; this listener
//! only maps pressed hotkey ids to [`HotkeySignal`]s using the bindings it
//! publishes.
//!
//! [`WindowShell`]: crate::WindowShell

use crate::{AppError, AppResult, window_shell::HotkeyBindings};

use macro_deck_core::EngineSignal;

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Global hotkey event forwarder.
pub struct HotkeyListener {
    bindings: watch::Receiver<HotkeyBindings>,
    signal_tx: mpsc::Sender<EngineSignal>,
}

impl HotkeyListener {
    /// Create a listener over the shell's current bindings.
    ///
    /// This struct is `Send` and can live on any thread; it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(
        bindings: watch::Receiver<HotkeyBindings>,
        signal_tx: mpsc::Sender<EngineSignal>,
    ) -> Self {
        Self {
            bindings,
            signal_tx,
        }
    }

    /// Run until shutdown is signalled.
    #[instrument(skip_all)]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // GlobalHotKeyEvent::receiver() is a crossbeam receiver with a blocking
        // recv(), so one blocking task forwards events without polling. It exits
        // on the first send after event_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey listener shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.state == HotKeyState::Pressed {
                        self.forward(event.id).await?;
                    }
                }
            }
        }

        drop(event_rx);

        // The blocking task may be parked in recv() until the next hotkey event.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn forward(&self, hotkey_id: u32) -> AppResult<()> {
        let signal = self.bindings.borrow().get(&hotkey_id).copied();

        let Some(signal) = signal else {
            debug!(hotkey_id, "Ignoring unbound hotkey");
            return Ok(());
        };

        debug!(%signal, "Hotkey pressed");

        self.signal_tx
            .send(EngineSignal::Hotkey(signal))
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to forward {}: {}", signal, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
