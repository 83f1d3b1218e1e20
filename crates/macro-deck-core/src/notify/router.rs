//! Routes user-facing messages to the banner or the toast channel.
//!
//! The compact layout has room for one line, so in [`WindowMode::Mini`] a
//! message replaces the banner and clears itself after a timeout. The normal
//! layout gets a toast per message.

use crate::{
    EngineError, SessionError,
    notify::{Banner, Severity, Toast},
    session::StateCell,
    window::WindowMode,
};

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

/// How long a banner stays visible without being replaced.
pub const DEFAULT_BANNER_TIMEOUT: Duration = Duration::from_millis(3000);

const TOAST_CAPACITY: usize = 32;

/// Delivery strategy, chosen once per notification from the window mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Banner,
    Toast,
}

impl Delivery {
    fn for_mode(mode: WindowMode) -> Self {
        match mode {
            WindowMode::Mini => Delivery::Banner,
            WindowMode::Normal => Delivery::Toast,
        }
    }
}

/// Chooses between the compact banner and the toast channel.
#[derive(Debug, Clone)]
pub struct NotificationRouter {
    state: StateCell,
    banner_tx: Arc<watch::Sender<Option<Banner>>>,
    toast_tx: broadcast::Sender<Toast>,
    banner_timeout: Duration,
    next_banner_id: Arc<AtomicU64>,
}

impl NotificationRouter {
    /// Create a router reading the window mode from `state`.
    pub fn new(state: StateCell, banner_timeout: Duration) -> Self {
        let (banner_tx, _banner_rx) = watch::channel(None);
        let (toast_tx, _toast_rx) = broadcast::channel(TOAST_CAPACITY);

        Self {
            state,
            banner_tx: Arc::new(banner_tx),
            toast_tx,
            banner_timeout,
            next_banner_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Show `message` to the user.
    ///
    /// Must be called from within a tokio runtime: banners spawn their
    /// auto-clear timer.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();

        match severity {
            Severity::Error => error!(%severity, text = %message, "Notification"),
            Severity::Warning => warn!(%severity, text = %message, "Notification"),
            Severity::Success | Severity::Info => info!(%severity, text = %message, "Notification"),
        }

        match Delivery::for_mode(self.state.window_mode()) {
            Delivery::Banner => self.show_banner(message),
            Delivery::Toast => self.show_toast(message, severity),
        }
    }

    /// Log a failed engine request and show it to the user.
    pub fn surface_engine_failure(&self, action: &str, source: &EngineError) {
        error!(error = ?source, "Failed to {}", action);
        self.notify(
            format!("Failed to {}: {}", action, source.reason()),
            Severity::Error,
        );
    }

    /// Surface an engine failure and convert it into a reported
    /// [`SessionError::Engine`].
    #[track_caller]
    pub(crate) fn engine_failure(&self, action: &str, source: EngineError) -> SessionError {
        self.surface_engine_failure(action, &source);
        SessionError::reported_engine(source)
    }

    /// The banner currently shown, if any.
    pub fn banner(&self) -> Option<Banner> {
        self.banner_tx.borrow().clone()
    }

    /// Subscribe to banner changes.
    pub fn subscribe_banner(&self) -> watch::Receiver<Option<Banner>> {
        self.banner_tx.subscribe()
    }

    /// Subscribe to toasts.
    pub fn subscribe_toasts(&self) -> broadcast::Receiver<Toast> {
        self.toast_tx.subscribe()
    }

    fn show_banner(&self, message: String) {
        let id = self.next_banner_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.banner_tx.send_replace(Some(Banner { id, message }));

        let banner_tx = Arc::clone(&self.banner_tx);
        let timeout = self.banner_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let cleared = banner_tx.send_if_modified(|banner| {
                if banner.as_ref().is_some_and(|current| current.id == id) {
                    *banner = None;
                    true
                } else {
                    false
                }
            });
            if cleared {
                debug!(banner_id = id, "Banner cleared");
            }
        });
    }

    fn show_toast(&self, message: String, severity: Severity) {
        // Err only means nobody is listening; the message was logged above.
        if self.toast_tx.send(Toast { message, severity }).is_err() {
            debug!("No toast subscribers");
        }
    }
}
