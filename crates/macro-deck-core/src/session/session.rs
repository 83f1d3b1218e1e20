//! Recording/playback session manager.
//!
//! Coordinates start/stop of recording and playback, turns finished
//! recordings into library macros, and keeps the selection persisted. All
//! state lives in the shared [`StateCell`]; every transition is a
//! check-and-set on that cell, so concurrent callers (user commands, gated
//! hotkeys, engine completions) can interleave freely.

use crate::{
    CoreResult, Engine, EngineError, EngineResult, SessionError,
    duration::estimate_duration_ms,
    model::{
        AppSettingsPatch, HotkeySettings, Macro, MacroEdit, MacroId, PlaybackSettings,
        RecordingSettings,
    },
    notify::{NotificationRouter, Severity},
    session::{
        MacroLibrary, PlaybackGuard, PlaybackSource, SessionPhase, StateCell, View,
    },
};

use std::{panic::Location, sync::Arc, time::Instant};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// The central recording/playback state machine.
pub struct Session<E: Engine> {
    engine: Arc<E>,
    state: StateCell,
    notifier: NotificationRouter,
}

impl<E: Engine> Clone for Session<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            state: self.state.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<E: Engine> Session<E> {
    /// Create a session manager over `engine`.
    pub fn new(engine: Arc<E>, state: StateCell, notifier: NotificationRouter) -> Self {
        Self {
            engine,
            state,
            notifier,
        }
    }

    /// Shared session state.
    pub fn state(&self) -> &StateCell {
        &self.state
    }

    /// Notification router used for user-facing messages.
    pub fn notifier(&self) -> &NotificationRouter {
        &self.notifier
    }

    /// Resynchronize with the engine at startup.
    ///
    /// Loads the library, hotkeys and settings, and adopts a recording that
    /// survived a restart. A persisted selection that no longer exists falls
    /// back to the first macro and is persisted again.
    ///
    /// Each query is independent: a failed one is surfaced and its defaults
    /// kept, and the others still apply. The selection is only resolved when
    /// both the library and the settings loaded.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> CoreResult<()> {
        let engine_recording = self
            .resync("query recording state", self.engine.is_recording().await)
            .unwrap_or(false);
        let macros = self.resync("load macros", self.engine.load_all_macros().await);
        let hotkeys = self.resync("load hotkeys", self.engine.get_hotkeys().await);
        let app_settings = self.resync("load settings", self.engine.get_app_settings().await);

        let library_loaded = macros.is_some();
        let library = MacroLibrary::new(macros.unwrap_or_default());
        let macro_count = library.len();

        let persisted = app_settings
            .as_ref()
            .map(|settings| settings.last_selected_macro_id.clone());
        let (selection, healed) = match persisted {
            Some(persisted) if library_loaded => {
                match library.resolve_selection(persisted.as_ref()) {
                    Ok(selection) => (selection, false),
                    Err(e) => {
                        debug!(error = %e, "Falling back to first macro");
                        (library.first_id(), true)
                    }
                }
            }
            _ => (None, false),
        };

        let session_id = Uuid::new_v4();
        self.state.update(|state| {
            state.library = library;
            if let Some(hotkeys) = hotkeys {
                state.hotkeys = hotkeys;
            }
            state.selected_macro_id = selection.clone();
            if engine_recording && state.phase.is_idle() {
                state.phase = SessionPhase::Recording {
                    started_at: Instant::now(),
                    session_id,
                };
            }
        });

        if healed {
            if let Err(e) = self.persist_selection(selection).await {
                debug!(error = %e, "Healed selection not persisted");
            }
        }

        info!(
            macro_count,
            engine_recording,
            settings_loaded = app_settings.is_some(),
            "Session initialized"
        );

        Ok(())
    }

    /// Start a recording. Ignored unless the session is idle.
    #[instrument(skip(self))]
    pub async fn start_recording(&self) -> CoreResult<()> {
        let (phase, settings) = self
            .state
            .read(|state| (state.phase, state.recording_settings));

        if !phase.is_idle() {
            debug!(?phase, "Start recording ignored, session busy");
            return Ok(());
        }

        if let Err(e) = self.engine.start_recording(settings).await {
            return Err(self.engine_failure("start recording", e));
        }

        let session_id = Uuid::new_v4();
        let started = self.state.update_if(|state| {
            if !state.phase.is_idle() {
                return false;
            }
            state.phase = SessionPhase::Recording {
                started_at: Instant::now(),
                session_id,
            };
            state.last_recorded_events.clear();
            true
        });

        if !started {
            // Playback won the race while the engine was starting.
            warn!(session_id = %session_id, "Session left idle during start, discarding capture");
            if let Err(e) = self.engine.stop_recording().await {
                warn!(session_id = %session_id, error = ?e, "Failed to discard capture");
            }
            return Ok(());
        }

        info!(session_id = %session_id, "Recording started");
        self.notifier.notify("Recording started", Severity::Success);

        Ok(())
    }

    /// Stop the current recording and save it as a new macro.
    ///
    /// Returns the created macro, or `None` when nothing was captured or no
    /// recording was running. An engine failure still ends the recording
    /// locally.
    #[instrument(skip(self))]
    pub async fn stop_recording(&self) -> CoreResult<Option<Macro>> {
        let SessionPhase::Recording {
            started_at,
            session_id,
        } = self.state.phase()
        else {
            debug!("Stop recording ignored, not recording");
            return Ok(None);
        };

        let result = self.engine.stop_recording().await;

        // The engine has ended the capture even if it could not return events.
        // Another stop may have ended this session, and a new one started,
        // while the request was in flight.
        let stopped = self.state.update_if(|state| {
            if !state.phase.is_session(session_id) {
                return false;
            }
            state.phase = SessionPhase::Idle;
            true
        });

        if !stopped {
            debug!(session_id = %session_id, "Recording already stopped, ignoring late stop");
            return Ok(None);
        }

        let events = match result {
            Ok(events) => events,
            Err(e) => return Err(self.engine_failure("stop recording", e)),
        };

        info!(
            session_id = %session_id,
            duration_ms = started_at.elapsed().as_millis(),
            event_count = events.len(),
            "Recording stopped"
        );

        self.state
            .update(|state| state.last_recorded_events = events.clone());

        if events.is_empty() {
            self.notifier
                .notify("Recording stopped: no events captured", Severity::Warning);
            return Ok(None);
        }

        let (name, recording_settings) = self.state.read(|state| {
            (
                state.library.next_default_name(),
                state.recording_settings,
            )
        });
        let macro_data = Macro::from_recording(name, events, recording_settings);

        if let Err(e) = self.engine.save_macro(macro_data.clone()).await {
            return Err(self.engine_failure("save recording", e));
        }

        let macro_id = macro_data.id.clone();
        self.state.update(|state| {
            state.library.upsert(macro_data.clone());
            state.selected_macro_id = Some(macro_id.clone());
        });
        if let Err(e) = self.persist_selection(Some(macro_id)).await {
            debug!(error = %e, "Selection of new recording not persisted");
        }

        info!(
            session_id = %session_id,
            macro_id = %macro_data.id,
            "Recording saved"
        );
        self.notifier.notify(
            format!(
                "Saved \"{}\" ({} events)",
                macro_data.name,
                macro_data.events.len()
            ),
            Severity::Success,
        );

        Ok(Some(macro_data))
    }

    /// Replay `source` with `settings` and wait for the engine to finish.
    ///
    /// Fails with [`SessionError::EmptyInput`] for an empty sequence. Ignored
    /// unless the session is idle. The playing phase is released when the
    /// request completes, fails, or this future is dropped.
    #[instrument(skip(self, source))]
    pub async fn playback(
        &self,
        source: PlaybackSource,
        settings: PlaybackSettings,
    ) -> CoreResult<()> {
        if source.events().is_empty() {
            return Err(SessionError::EmptyInput {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        settings.validate()?;

        let run_id = Uuid::new_v4();
        let started = self.state.update_if(|state| {
            if !state.phase.is_idle() {
                return false;
            }
            state.phase = SessionPhase::Playing {
                started_at: Instant::now(),
                run_id,
            };
            true
        });

        if !started {
            debug!("Playback ignored, session busy");
            return Ok(());
        }

        let guard = PlaybackGuard::new(self.state.clone(), run_id);

        let event_count = source.events().len();
        let estimate_ms = estimate_duration_ms(source.events(), &settings);
        let macro_data = source.into_macro(settings);

        info!(
            run_id = %run_id,
            macro_name = %macro_data.name,
            event_count,
            estimate_ms,
            "Playback started"
        );
        self.notifier
            .notify(format!("Playing \"{}\"", macro_data.name), Severity::Info);

        let result = self.engine.play_macro(macro_data).await;
        let still_current = guard.is_current();
        drop(guard);

        match result {
            Ok(()) if still_current => {
                info!(run_id = %run_id, "Playback completed");
                self.notifier.notify("Playback completed", Severity::Success);
                Ok(())
            }
            Ok(()) => {
                debug!(run_id = %run_id, "Playback finished after it was stopped");
                Ok(())
            }
            Err(e) if still_current => Err(self.engine_failure("play macro", e)),
            Err(e) => {
                debug!(run_id = %run_id, error = ?e, "Stopped playback reported an error");
                Ok(())
            }
        }
    }

    /// Replay a saved macro with its own playback settings.
    pub async fn play_macro(&self, macro_id: &MacroId) -> CoreResult<()> {
        let macro_data = self.find_macro(macro_id)?;
        let settings = macro_data.playback_settings;
        self.playback(PlaybackSource::Macro(macro_data), settings)
            .await
    }

    /// Replay the working buffer with the session's playback settings.
    pub async fn play_buffer(&self) -> CoreResult<()> {
        let (events, settings) = self.state.read(|state| {
            (
                state.last_recorded_events.clone(),
                state.playback_settings,
            )
        });
        self.playback(PlaybackSource::Events(events), settings)
            .await
    }

    /// Stop playback locally.
    ///
    /// Returns immediately; the engine is asked to cancel in the background
    /// and may still simulate a few events after this returns.
    #[instrument(skip(self))]
    pub fn stop_playback(&self) -> bool {
        let stopped = self.state.update_if(|state| {
            if !state.phase.is_playing() {
                return false;
            }
            state.phase = SessionPhase::Idle;
            true
        });

        if !stopped {
            debug!("Stop playback ignored, not playing");
            return false;
        }

        info!("Playback stopped");
        self.notifier.notify("Playback stopped", Severity::Info);

        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            if let Err(e) = engine.cancel_playback().await {
                warn!(error = ?e, "Engine did not accept playback cancellation");
            }
        });

        true
    }

    /// Delete a macro.
    ///
    /// Removed locally first. If it was selected, the first remaining macro
    /// (or nothing) becomes selected and the new selection is persisted.
    #[instrument(skip(self))]
    pub async fn delete_macro(&self, macro_id: &MacroId) -> CoreResult<()> {
        let mut removed = None;
        let mut reselected = None;
        self.state.update(|state| {
            removed = state.library.remove(macro_id);
            if removed.is_some() && state.selected_macro_id.as_ref() == Some(macro_id) {
                state.selected_macro_id = state.library.first_id();
                reselected = Some(state.selected_macro_id.clone());
            }
        });

        let Some(removed) = removed else {
            return Err(SessionError::MacroNotFound {
                macro_id: macro_id.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let result = self.engine.delete_macro(macro_id.clone()).await;

        if let Some(selection) = reselected {
            if let Err(e) = self.persist_selection(selection).await {
                debug!(error = %e, "Fallback selection not persisted");
            }
        }

        if let Err(e) = result {
            return Err(self.engine_failure("delete macro", e));
        }

        info!(macro_id = %macro_id, "Macro deleted");
        self.notifier
            .notify(format!("Deleted \"{}\"", removed.name), Severity::Success);

        Ok(())
    }

    /// Select a macro and persist the selection immediately.
    #[instrument(skip(self))]
    pub async fn select_macro(&self, macro_id: MacroId) -> CoreResult<()> {
        let found = self.state.update_if(|state| {
            if !state.library.contains(&macro_id) {
                return false;
            }
            state.selected_macro_id = Some(macro_id.clone());
            true
        });

        if !found {
            return Err(SessionError::MacroNotFound {
                macro_id,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.persist_selection(Some(macro_id)).await
    }

    /// Import a macro through the engine and add it to the library.
    #[instrument(skip(self))]
    pub async fn import_macro(&self) -> CoreResult<Option<Macro>> {
        let imported = match self.engine.import_macro().await {
            Ok(imported) => imported,
            Err(e) => return Err(self.engine_failure("import macro", e)),
        };

        let Some(macro_data) = imported else {
            debug!("Import returned nothing");
            return Ok(None);
        };

        self.state
            .update(|state| state.library.upsert(macro_data.clone()));

        if let Err(e) = self.engine.save_macro(macro_data.clone()).await {
            return Err(self.engine_failure("save imported macro", e));
        }

        info!(macro_id = %macro_data.id, "Macro imported");
        self.notifier
            .notify(format!("Imported \"{}\"", macro_data.name), Severity::Success);

        Ok(Some(macro_data))
    }

    /// Export a macro through the engine.
    #[instrument(skip(self))]
    pub async fn export_macro(&self, macro_id: &MacroId) -> CoreResult<()> {
        let macro_data = self.find_macro(macro_id)?;
        let name = macro_data.name.clone();

        if let Err(e) = self.engine.export_macro(macro_data).await {
            return Err(self.engine_failure("export macro", e));
        }

        self.notifier
            .notify(format!("Exported \"{name}\""), Severity::Success);

        Ok(())
    }

    /// Rename, re-describe or change the default playback of a macro.
    #[instrument(skip(self, edit))]
    pub async fn edit_macro(&self, macro_id: &MacroId, edit: MacroEdit) -> CoreResult<Macro> {
        if let Some(settings) = &edit.playback_settings {
            settings.validate()?;
        }

        let mut macro_data = self.find_macro(macro_id)?;
        macro_data.apply_edit(edit);

        if let Err(e) = self.engine.save_macro(macro_data.clone()).await {
            return Err(self.engine_failure("save macro", e));
        }

        self.state
            .update(|state| state.library.upsert(macro_data.clone()));
        debug!(macro_id = %macro_id, "Macro updated");

        Ok(macro_data)
    }

    /// Replace the capture filters. Only allowed while idle.
    #[track_caller]
    pub fn update_recording_settings(&self, settings: RecordingSettings) -> CoreResult<()> {
        let applied = self.state.update_if(|state| {
            if !state.phase.is_idle() {
                return false;
            }
            state.recording_settings = settings;
            true
        });

        if !applied {
            return Err(SessionError::Busy {
                operation: "change recording settings",
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(?settings, "Recording settings updated");
        Ok(())
    }

    /// Replace the working playback settings. Only allowed while idle.
    #[track_caller]
    pub fn update_playback_settings(&self, settings: PlaybackSettings) -> CoreResult<()> {
        settings.validate()?;

        let applied = self.state.update_if(|state| {
            if !state.phase.is_idle() {
                return false;
            }
            state.playback_settings = settings;
            true
        });

        if !applied {
            return Err(SessionError::Busy {
                operation: "change playback settings",
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(?settings, "Playback settings updated");
        Ok(())
    }

    /// Push new hotkeys to the engine, then adopt them locally.
    #[instrument(skip(self))]
    pub async fn update_hotkeys(&self, hotkeys: HotkeySettings) -> CoreResult<()> {
        if let Err(e) = self.engine.update_hotkeys(hotkeys.clone()).await {
            return Err(self.engine_failure("update hotkeys", e));
        }

        self.state.update(|state| state.hotkeys = hotkeys);
        self.notifier.notify("Hotkeys updated", Severity::Success);

        Ok(())
    }

    /// Persist the always-on-top preference.
    #[instrument(skip(self))]
    pub async fn set_always_on_top(&self, always_on_top: bool) -> CoreResult<()> {
        if let Err(e) = self
            .engine
            .update_app_settings(AppSettingsPatch::always_on_top(always_on_top))
            .await
        {
            return Err(self.engine_failure("update always-on-top", e));
        }
        Ok(())
    }

    /// Switch the active view.
    pub fn set_view(&self, view: View) {
        self.state.update(|state| state.current_view = view);
        debug!(%view, "View changed");
    }

    /// Surface a warning reported by the recorder.
    pub fn recording_warning(&self, message: &str) {
        self.notifier.notify(message, Severity::Warning);
    }

    #[track_caller]
    fn find_macro(&self, macro_id: &MacroId) -> CoreResult<Macro> {
        self.state
            .read(|state| state.library.get(macro_id).cloned())
            .ok_or_else(|| SessionError::MacroNotFound {
                macro_id: macro_id.clone(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    async fn persist_selection(&self, selection: Option<MacroId>) -> CoreResult<()> {
        if let Err(e) = self
            .engine
            .update_app_settings(AppSettingsPatch::selection(selection))
            .await
        {
            return Err(self.engine_failure("save selection", e));
        }
        Ok(())
    }

    /// Log, surface and convert an engine failure.
    #[track_caller]
    fn engine_failure(&self, action: &str, source: EngineError) -> SessionError {
        self.notifier.engine_failure(action, source)
    }

    /// Keep a startup query's value, or surface its failure.
    fn resync<T>(&self, action: &str, result: EngineResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.notifier.surface_engine_failure(action, &e);
                None
            }
        }
    }
}
