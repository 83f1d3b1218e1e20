#![allow(clippy::unwrap_used)]

use crate::{
    AppSettings, AppSettingsPatch, DEFAULT_BANNER_TIMEOUT, Engine, EngineError, EngineResult,
    HotkeySettings, Macro, MacroEvent, MacroEventKind, MacroId, NotificationRouter,
    RecordingSettings, Session, SessionState, StateCell, WindowModeController, WindowPolicy,
    WindowSize,
};

use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::sync::Notify;

/// Request observed by [`FakeEngine`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    StartRecording(RecordingSettings),
    StopRecording,
    IsRecording,
    PlayMacro(String),
    CancelPlayback,
    SaveMacro(MacroId),
    DeleteMacro(MacroId),
    ImportMacro,
    ExportMacro(MacroId),
    LoadAllMacros,
    GetHotkeys,
    UpdateHotkeys(HotkeySettings),
    GetAppSettings,
    UpdateAppSettings(AppSettingsPatch),
    SetWindowSize(WindowSize),
    Minimize,
    Maximize,
    Close,
}

/// In-memory engine that records every request.
#[derive(Default)]
pub(crate) struct FakeEngine {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<&'static str>>,
    captured: Mutex<Vec<MacroEvent>>,
    stored: Mutex<Vec<Macro>>,
    app_settings: Mutex<AppSettings>,
    importable: Mutex<Option<Macro>>,
    recording: AtomicBool,
    hold_playback: AtomicBool,
    playback_release: Notify,
    hold_stop: AtomicBool,
    stop_release: Notify,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_macros(macros: Vec<Macro>) -> Self {
        let engine = Self::default();
        *engine.stored.lock().unwrap() = macros;
        engine
    }

    /// Make every request named `operation` fail.
    pub(crate) fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    /// Events returned by the next `stop_recording`.
    pub(crate) fn set_captured(&self, events: Vec<MacroEvent>) {
        *self.captured.lock().unwrap() = events;
    }

    pub(crate) fn set_app_settings(&self, settings: AppSettings) {
        *self.app_settings.lock().unwrap() = settings;
    }

    pub(crate) fn set_importable(&self, macro_data: Macro) {
        *self.importable.lock().unwrap() = Some(macro_data);
    }

    pub(crate) fn set_recording(&self, recording: bool) {
        self.recording.store(recording, Ordering::SeqCst);
    }

    /// Keep `play_macro` pending until [`FakeEngine::finish_one_playback`].
    pub(crate) fn hold_playback(&self) {
        self.hold_playback.store(true, Ordering::SeqCst);
    }

    /// Let the oldest pending `play_macro` complete.
    pub(crate) fn finish_one_playback(&self) {
        self.playback_release.notify_one();
    }

    /// Keep the next `stop_recording` pending until [`FakeEngine::finish_held_stop`].
    pub(crate) fn hold_next_stop(&self) {
        self.hold_stop.store(true, Ordering::SeqCst);
    }

    pub(crate) fn finish_held_stop(&self) {
        self.stop_release.notify_one();
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub(crate) fn stored_ids(&self) -> Vec<MacroId> {
        self.stored
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.id.clone())
            .collect()
    }

    pub(crate) fn app_settings(&self) -> AppSettings {
        self.app_settings.lock().unwrap().clone()
    }

    fn record(&self, call: Call, operation: &'static str) -> EngineResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(operation) {
            return Err(EngineError::request_failed(operation, "injected failure"));
        }
        Ok(())
    }
}

impl Engine for FakeEngine {
    async fn start_recording(&self, settings: RecordingSettings) -> EngineResult<()> {
        self.record(Call::StartRecording(settings), "start_recording")?;
        self.recording.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_recording(&self) -> EngineResult<Vec<MacroEvent>> {
        self.recording.store(false, Ordering::SeqCst);
        self.record(Call::StopRecording, "stop_recording")?;
        if self.hold_stop.swap(false, Ordering::SeqCst) {
            self.stop_release.notified().await;
        }
        Ok(std::mem::take(&mut *self.captured.lock().unwrap()))
    }

    async fn is_recording(&self) -> EngineResult<bool> {
        self.record(Call::IsRecording, "is_recording")?;
        Ok(self.recording.load(Ordering::SeqCst))
    }

    async fn play_macro(&self, macro_data: Macro) -> EngineResult<()> {
        self.record(Call::PlayMacro(macro_data.name.clone()), "play_macro")?;
        if self.hold_playback.load(Ordering::SeqCst) {
            self.playback_release.notified().await;
        }
        Ok(())
    }

    async fn cancel_playback(&self) -> EngineResult<()> {
        self.record(Call::CancelPlayback, "cancel_playback")
    }

    async fn save_macro(&self, macro_data: Macro) -> EngineResult<()> {
        self.record(Call::SaveMacro(macro_data.id.clone()), "save_macro")?;
        let mut stored = self.stored.lock().unwrap();
        match stored.iter_mut().find(|m| m.id == macro_data.id) {
            Some(existing) => *existing = macro_data,
            None => stored.push(macro_data),
        }
        Ok(())
    }

    async fn delete_macro(&self, macro_id: MacroId) -> EngineResult<()> {
        self.record(Call::DeleteMacro(macro_id.clone()), "delete_macro")?;
        self.stored.lock().unwrap().retain(|m| m.id != macro_id);
        Ok(())
    }

    async fn import_macro(&self) -> EngineResult<Option<Macro>> {
        self.record(Call::ImportMacro, "import_macro")?;
        Ok(self.importable.lock().unwrap().take())
    }

    async fn export_macro(&self, macro_data: Macro) -> EngineResult<()> {
        self.record(Call::ExportMacro(macro_data.id), "export_macro")
    }

    async fn load_all_macros(&self) -> EngineResult<Vec<Macro>> {
        self.record(Call::LoadAllMacros, "load_all_macros")?;
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn get_hotkeys(&self) -> EngineResult<HotkeySettings> {
        self.record(Call::GetHotkeys, "get_hotkeys")?;
        Ok(HotkeySettings::default())
    }

    async fn update_hotkeys(&self, hotkeys: HotkeySettings) -> EngineResult<()> {
        self.record(Call::UpdateHotkeys(hotkeys), "update_hotkeys")
    }

    async fn get_app_settings(&self) -> EngineResult<AppSettings> {
        self.record(Call::GetAppSettings, "get_app_settings")?;
        Ok(self.app_settings())
    }

    async fn update_app_settings(&self, patch: AppSettingsPatch) -> EngineResult<()> {
        self.record(Call::UpdateAppSettings(patch.clone()), "update_app_settings")?;
        patch.apply_to(&mut self.app_settings.lock().unwrap());
        Ok(())
    }

    async fn set_window_size(&self, size: WindowSize) -> EngineResult<()> {
        self.record(Call::SetWindowSize(size), "set_window_size")
    }

    async fn minimize(&self) -> EngineResult<()> {
        self.record(Call::Minimize, "minimize")
    }

    async fn maximize(&self) -> EngineResult<()> {
        self.record(Call::Maximize, "maximize")
    }

    async fn close(&self) -> EngineResult<()> {
        self.record(Call::Close, "close")
    }
}

/// Session, window controller and fake engine sharing one state cell.
pub(crate) struct Harness {
    pub(crate) engine: Arc<FakeEngine>,
    pub(crate) state: StateCell,
    pub(crate) notifier: NotificationRouter,
    pub(crate) session: Session<FakeEngine>,
    pub(crate) window: WindowModeController<FakeEngine>,
}

impl Harness {
    pub(crate) fn new(engine: FakeEngine) -> Self {
        Self::with_state(engine, SessionState::default())
    }

    pub(crate) fn with_state(engine: FakeEngine, initial: SessionState) -> Self {
        let engine = Arc::new(engine);
        let state = StateCell::new(initial);
        let notifier = NotificationRouter::new(state.clone(), DEFAULT_BANNER_TIMEOUT);
        let session = Session::new(Arc::clone(&engine), state.clone(), notifier.clone());
        let window = WindowModeController::new(
            Arc::clone(&engine),
            state.clone(),
            notifier.clone(),
            WindowPolicy::default(),
        );

        Self {
            engine,
            state,
            notifier,
            session,
            window,
        }
    }

    /// Wait until the session state satisfies `ready`.
    pub(crate) async fn wait_until(&self, ready: impl FnMut(&SessionState) -> bool) {
        let mut rx = self.state.subscribe();
        rx.wait_for(ready).await.unwrap();
    }
}

/// Key presses spaced `step_ms` apart, starting at zero.
pub(crate) fn key_events(count: usize, step_ms: u64) -> Vec<MacroEvent> {
    (0..count as u64)
        .map(|i| {
            MacroEvent::new(
                i * step_ms,
                MacroEventKind::KeyPress {
                    key: "KeyA".to_string(),
                },
            )
        })
        .collect()
}

pub(crate) fn sample_macro(name: &str) -> Macro {
    Macro::from_recording(name, key_events(3, 100), RecordingSettings::default())
}
