//! Long-lived event loop tying the components together.
//!
//! Inbound engine signals and user commands arrive on two channels. Hotkeys
//! pass through the [`HotkeyGate`], resizes through the [`ResizeDebouncer`],
//! and every engine request runs as its own task so the loop never waits on
//! the engine.

use crate::{
    CoreResult, Engine, SessionError,
    engine::EngineSignal,
    hotkey::{GatedAction, HotkeyGate},
    notify::{NotificationRouter, Severity},
    orchestrator::UserCommand,
    session::{PlaybackSource, Session, StateCell},
    window::{ResizeDebouncer, WindowModeController, WindowPolicy},
};

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinSet,
};
use tracing::{debug, error, info, instrument, warn};

/// How long in-flight requests may run after shutdown before being aborted.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Routes signals and commands to the session and window controller.
pub struct Orchestrator<E: Engine> {
    session: Session<E>,
    window: WindowModeController<E>,
    gate: HotkeyGate,
    tasks: JoinSet<()>,
}

impl<E: Engine> Orchestrator<E> {
    /// Wire the components around one engine and one state cell.
    pub fn new(
        engine: Arc<E>,
        state: StateCell,
        notifier: NotificationRouter,
        policy: WindowPolicy,
    ) -> Self {
        Self {
            session: Session::new(Arc::clone(&engine), state.clone(), notifier.clone()),
            window: WindowModeController::new(engine, state.clone(), notifier, policy),
            gate: HotkeyGate::new(state),
            tasks: JoinSet::new(),
        }
    }

    /// The session manager.
    pub fn session(&self) -> &Session<E> {
        &self.session
    }

    /// The window mode controller.
    pub fn window(&self) -> &WindowModeController<E> {
        &self.window
    }

    /// Run until shutdown is signalled, a [`UserCommand::Shutdown`] arrives,
    /// or both input channels close.
    #[instrument(skip_all)]
    pub async fn run(
        mut self,
        mut signal_rx: mpsc::Receiver<EngineSignal>,
        mut command_rx: mpsc::Receiver<UserCommand>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> CoreResult<()> {
        info!("Orchestrator starting");

        let (debouncer, debounce_handle) = ResizeDebouncer::spawn(self.window.clone());
        let mut signals_open = true;
        let mut commands_open = true;

        while signals_open || commands_open {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Orchestrator shutting down");
                    break;
                }

                signal = signal_rx.recv(), if signals_open => match signal {
                    Some(signal) => self.handle_signal(signal, &debouncer),
                    None => {
                        debug!("Signal channel closed");
                        signals_open = false;
                    }
                },

                command = command_rx.recv(), if commands_open => match command {
                    Some(command) => {
                        if !self.handle_command(command) {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                    None => {
                        debug!("Command channel closed");
                        commands_open = false;
                    }
                },

                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = ?e, "Session task panicked");
                    }
                }
            }
        }

        if !signals_open && !commands_open {
            info!("All channels closed, shutting down");
        }

        // Closing the debouncer's channel ends its task.
        drop(debouncer);

        let drained = tokio::time::timeout(SHUTDOWN_GRACE, drain(&mut self.tasks)).await;
        match drained {
            Ok(()) => debug!("In-flight requests finished"),
            Err(_) => {
                warn!(
                    remaining = self.tasks.len(),
                    "In-flight requests did not finish within timeout, aborting"
                );
                self.tasks.abort_all();
                // Aborted tasks drop their futures, releasing any playback they held.
                drain(&mut self.tasks).await;
            }
        }

        match tokio::time::timeout(SHUTDOWN_GRACE, debounce_handle).await {
            Ok(Ok(())) => debug!("Resize debouncer stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Resize debouncer task panicked"),
            Err(_) => debug!("Resize debouncer did not stop within timeout"),
        }

        info!("Orchestrator stopped");

        Ok(())
    }

    fn handle_signal(&mut self, signal: EngineSignal, debouncer: &ResizeDebouncer) {
        match signal {
            EngineSignal::Resize(size) => debouncer.signal(size),
            EngineSignal::RecordingWarning(message) => self.session.recording_warning(&message),
            EngineSignal::Hotkey(hotkey) => {
                if let Some(action) = self.gate.admit(hotkey) {
                    debug!(%hotkey, "Hotkey admitted");
                    self.dispatch(action);
                }
            }
        }
    }

    fn dispatch(&mut self, action: GatedAction) {
        let session = self.session.clone();
        match action {
            GatedAction::StartRecording => {
                self.spawn("start recording", async move { session.start_recording().await });
            }
            GatedAction::StopRecording => {
                self.spawn("stop recording", async move {
                    session.stop_recording().await.map(|_| ())
                });
            }
            GatedAction::StartPlayback { events, settings } => {
                self.spawn("play buffer", async move {
                    session
                        .playback(PlaybackSource::Events(events), settings)
                        .await
                });
            }
            GatedAction::StopPlayback => {
                session.stop_playback();
            }
        }
    }

    /// Returns `false` when the loop should stop.
    fn handle_command(&mut self, command: UserCommand) -> bool {
        let session = self.session.clone();
        let window = self.window.clone();

        match command {
            UserCommand::StartRecording => {
                self.spawn("start recording", async move { session.start_recording().await });
            }
            UserCommand::StopRecording => {
                self.spawn("stop recording", async move {
                    session.stop_recording().await.map(|_| ())
                });
            }
            UserCommand::PlayMacro(macro_id) => {
                self.spawn("play macro", async move { session.play_macro(&macro_id).await });
            }
            UserCommand::PlaySelected => {
                self.spawn("play selection", async move {
                    let selected = session.state().read(|state| state.selected_macro_id.clone());
                    match selected {
                        Some(macro_id) => session.play_macro(&macro_id).await,
                        None => session.play_buffer().await,
                    }
                });
            }
            UserCommand::PlayBuffer => {
                self.spawn("play buffer", async move { session.play_buffer().await });
            }
            UserCommand::StopPlayback => {
                session.stop_playback();
            }
            UserCommand::SelectMacro(macro_id) => {
                self.spawn("select macro", async move { session.select_macro(macro_id).await });
            }
            UserCommand::DeleteMacro(macro_id) => {
                self.spawn("delete macro", async move { session.delete_macro(&macro_id).await });
            }
            UserCommand::ImportMacro => {
                self.spawn("import macro", async move {
                    session.import_macro().await.map(|_| ())
                });
            }
            UserCommand::ExportMacro(macro_id) => {
                self.spawn("export macro", async move { session.export_macro(&macro_id).await });
            }
            UserCommand::EditMacro { macro_id, edit } => {
                self.spawn("edit macro", async move {
                    session.edit_macro(&macro_id, edit).await.map(|_| ())
                });
            }
            UserCommand::SetView(view) => session.set_view(view),
            UserCommand::ToggleMiniMode => {
                self.spawn("toggle mini mode", async move { window.toggle().await.map(|_| ()) });
            }
            UserCommand::ExpandWindow => {
                self.spawn("expand window", async move { window.expand().await });
            }
            UserCommand::Minimize => {
                self.spawn("minimize", async move { window.minimize().await });
            }
            UserCommand::Maximize => {
                self.spawn("maximize", async move { window.maximize().await });
            }
            UserCommand::Close => {
                self.spawn("close", async move { window.close().await });
            }
            UserCommand::UpdateRecordingSettings(settings) => {
                let result = session.update_recording_settings(settings);
                report("update recording settings", session.notifier(), result);
            }
            UserCommand::UpdatePlaybackSettings(settings) => {
                let result = session.update_playback_settings(settings);
                report("update playback settings", session.notifier(), result);
            }
            UserCommand::UpdateHotkeys(hotkeys) => {
                self.spawn("update hotkeys", async move { session.update_hotkeys(hotkeys).await });
            }
            UserCommand::SetAlwaysOnTop(always_on_top) => {
                self.spawn("set always-on-top", async move {
                    session.set_always_on_top(always_on_top).await
                });
            }
            UserCommand::Shutdown => return false,
        }

        true
    }

    fn spawn<F>(&mut self, operation: &'static str, request: F)
    where
        F: Future<Output = CoreResult<()>> + Send + 'static,
    {
        let notifier = self.session.notifier().clone();
        self.tasks.spawn(async move {
            report(operation, &notifier, request.await);
        });
    }
}

/// Surface failures the session did not already report.
fn report(operation: &'static str, notifier: &NotificationRouter, result: CoreResult<()>) {
    let Err(e) = result else {
        return;
    };

    if e.is_reported() {
        debug!(operation, error = %e, "Request failed");
        return;
    }

    if matches!(e, SessionError::Engine { .. }) {
        error!(operation, error = ?e, "Request failed");
    } else {
        warn!(operation, error = %e, "Request rejected");
    }
    let severity = match &e {
        SessionError::EmptyInput { .. } | SessionError::Busy { .. } => Severity::Warning,
        _ => Severity::Error,
    };
    notifier.notify(e.summary(), severity);
}

async fn drain(tasks: &mut JoinSet<()>) {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Err(e) if e.is_panic() => error!(error = ?e, "Session task panicked during shutdown"),
            Err(_) => debug!("Session task aborted"),
            Ok(()) => {}
        }
    }
}
