use crate::{
    Engine,
    window::{WindowModeController, WindowSize},
};

use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

/// Coalesces host resize signals.
///
/// Only the last size of a burst is evaluated, once no new size has arrived
/// for the policy's quiet period. Dragging a window edge therefore causes at
/// most one mode transition.
#[derive(Debug)]
pub struct ResizeDebouncer {
    tx: watch::Sender<Option<WindowSize>>,
}

impl ResizeDebouncer {
    /// Spawn the debounce task feeding `controller`.
    pub fn spawn<E: Engine>(controller: WindowModeController<E>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = watch::channel(None);
        let quiet = controller.policy().debounce;
        let handle = tokio::spawn(run(controller, rx, quiet));
        (Self { tx }, handle)
    }

    /// Record a new window size. Never blocks.
    pub fn signal(&self, size: WindowSize) {
        self.tx.send_replace(Some(size));
    }
}

async fn run<E: Engine>(
    controller: WindowModeController<E>,
    mut rx: watch::Receiver<Option<WindowSize>>,
    quiet: Duration,
) {
    while rx.changed().await.is_ok() {
        // Restart the quiet period on every new size.
        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        debug!("Resize debouncer stopped mid-burst");
                        return;
                    }
                }
                _ = tokio::time::sleep(quiet) => break,
            }
        }

        let Some(size) = *rx.borrow_and_update() else {
            continue;
        };

        // The controller has already surfaced engine failures.
        if let Err(e) = controller.apply_resize(size).await {
            debug!(%size, error = %e, "Resize not applied");
        }
    }

    debug!("Resize debouncer stopped");
}
