//! Compact/normal window state machine.

use crate::{
    CoreResult, Engine,
    model::AppSettingsPatch,
    notify::NotificationRouter,
    session::StateCell,
    window::{WindowMode, WindowPolicy, WindowSize},
};

use std::sync::Arc;

use tracing::{info, instrument, trace};

/// Owns the compact/normal window mode and issues window commands.
///
/// The mode lives in the shared [`StateCell`] and is read there on every
/// evaluation. It is written before the size command goes out, so resize
/// events caused by that command are judged against the new mode. Failed
/// window commands are logged and shown to the user.
pub struct WindowModeController<E: Engine> {
    engine: Arc<E>,
    state: StateCell,
    notifier: NotificationRouter,
    policy: WindowPolicy,
}

impl<E: Engine> Clone for WindowModeController<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            state: self.state.clone(),
            notifier: self.notifier.clone(),
            policy: self.policy,
        }
    }
}

impl<E: Engine> WindowModeController<E> {
    /// Create a controller.
    pub fn new(
        engine: Arc<E>,
        state: StateCell,
        notifier: NotificationRouter,
        policy: WindowPolicy,
    ) -> Self {
        Self {
            engine,
            state,
            notifier,
            policy,
        }
    }

    /// Transition thresholds and targets.
    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    /// Current mode.
    pub fn mode(&self) -> WindowMode {
        self.state.window_mode()
    }

    /// Switch to the other mode. Returns the mode entered.
    #[instrument(skip(self))]
    pub async fn toggle(&self) -> CoreResult<WindowMode> {
        let target = match self.mode() {
            WindowMode::Normal => WindowMode::Mini,
            WindowMode::Mini => WindowMode::Normal,
        };
        self.enter(target).await?;
        Ok(target)
    }

    /// Leave the compact layout. No-op in normal mode.
    #[instrument(skip(self))]
    pub async fn expand(&self) -> CoreResult<()> {
        self.enter(WindowMode::Normal).await
    }

    /// Enter the compact layout. No-op in mini mode.
    #[instrument(skip(self))]
    pub async fn collapse(&self) -> CoreResult<()> {
        self.enter(WindowMode::Mini).await
    }

    /// Evaluate a settled window size.
    ///
    /// Returns the mode entered, or `None` when the size does not cross a
    /// threshold for the current mode.
    #[instrument(skip(self))]
    pub async fn apply_resize(&self, size: WindowSize) -> CoreResult<Option<WindowMode>> {
        let current = self.mode();

        let Some(target) = self.policy.transition_for(current, size) else {
            trace!(%size, mode = ?current, "Resize within bounds");
            return Ok(None);
        };

        info!(%size, from = ?current, to = ?target, "Resize crossed mode threshold");
        self.enter(target).await?;

        Ok(Some(target))
    }

    /// Minimize the host window.
    pub async fn minimize(&self) -> CoreResult<()> {
        self.engine
            .minimize()
            .await
            .map_err(|e| self.notifier.engine_failure("minimize window", e))
    }

    /// Maximize the host window.
    pub async fn maximize(&self) -> CoreResult<()> {
        self.engine
            .maximize()
            .await
            .map_err(|e| self.notifier.engine_failure("maximize window", e))
    }

    /// Close the host window.
    pub async fn close(&self) -> CoreResult<()> {
        self.engine
            .close()
            .await
            .map_err(|e| self.notifier.engine_failure("close window", e))
    }

    async fn enter(&self, target: WindowMode) -> CoreResult<()> {
        let changed = self.state.update_if(|state| {
            if state.window_mode == target {
                return false;
            }
            state.window_mode = target;
            true
        });

        if !changed {
            return Ok(());
        }

        info!(mode = ?target, "Window mode changed");

        if target == WindowMode::Mini {
            self.pin_on_top();
        }

        self.engine
            .set_window_size(self.policy.target_size(target))
            .await
            .map_err(|e| self.notifier.engine_failure("resize window", e))
    }

    // Entering mini mode pins the window. Leaving does not unpin it.
    fn pin_on_top(&self) {
        let engine = Arc::clone(&self.engine);
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = engine
                .update_app_settings(AppSettingsPatch::always_on_top(true))
                .await
            {
                notifier.surface_engine_failure("pin window on top", &e);
            }
        });
    }
}
