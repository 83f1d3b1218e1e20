//! Contract of the external engine that captures, simulates and persists.
//!
//! Every request is asynchronous and may fail with an [`EngineError`].
//! Implementations must be shareable across tasks: the orchestrator issues
//! requests concurrently and never assumes ordering between completions.
//!
//! [`EngineError`]: crate::EngineError

use crate::{
    EngineResult,
    model::{AppSettings, AppSettingsPatch, HotkeySettings, Macro, MacroEvent, MacroId, RecordingSettings},
    window::WindowSize,
};

use std::future::Future;

/// Requests the orchestrator issues to the engine.
pub trait Engine: Send + Sync + 'static {
    /// Begin capturing input with the given filters.
    fn start_recording(
        &self,
        settings: RecordingSettings,
    ) -> impl Future<Output = EngineResult<()>> + Send;

    /// End capturing and return the captured sequence.
    fn stop_recording(&self) -> impl Future<Output = EngineResult<Vec<MacroEvent>>> + Send;

    /// Whether the engine is currently capturing. Queried once at startup.
    fn is_recording(&self) -> impl Future<Output = EngineResult<bool>> + Send;

    /// Replay a macro. Resolves when playback finishes; the engine owns all
    /// timing, speed and repeat handling.
    fn play_macro(&self, macro_data: Macro) -> impl Future<Output = EngineResult<()>> + Send;

    /// Ask the engine to stop simulating events. Best effort; callers do not
    /// wait for the engine to actually stop.
    fn cancel_playback(&self) -> impl Future<Output = EngineResult<()>> + Send;

    /// Insert or replace a macro in persistent storage.
    fn save_macro(&self, macro_data: Macro) -> impl Future<Output = EngineResult<()>> + Send;

    /// Remove a macro from persistent storage.
    fn delete_macro(&self, macro_id: MacroId) -> impl Future<Output = EngineResult<()>> + Send;

    /// Import a macro chosen by the engine. `None` when nothing was imported.
    fn import_macro(&self) -> impl Future<Output = EngineResult<Option<Macro>>> + Send;

    /// Export a macro to a location chosen by the engine.
    fn export_macro(&self, macro_data: Macro) -> impl Future<Output = EngineResult<()>> + Send;

    /// Load the whole macro library.
    fn load_all_macros(&self) -> impl Future<Output = EngineResult<Vec<Macro>>> + Send;

    /// Current hotkey bindings.
    fn get_hotkeys(&self) -> impl Future<Output = EngineResult<HotkeySettings>> + Send;

    /// Re-register and persist hotkey bindings.
    fn update_hotkeys(
        &self,
        hotkeys: HotkeySettings,
    ) -> impl Future<Output = EngineResult<()>> + Send;

    /// Current application settings.
    fn get_app_settings(&self) -> impl Future<Output = EngineResult<AppSettings>> + Send;

    /// Apply and persist a partial settings update.
    fn update_app_settings(
        &self,
        patch: AppSettingsPatch,
    ) -> impl Future<Output = EngineResult<()>> + Send;

    /// Resize the host window.
    fn set_window_size(&self, size: WindowSize) -> impl Future<Output = EngineResult<()>> + Send;

    /// Minimize the host window.
    fn minimize(&self) -> impl Future<Output = EngineResult<()>> + Send;

    /// Maximize the host window.
    fn maximize(&self) -> impl Future<Output = EngineResult<()>> + Send;

    /// Close the host window.
    fn close(&self) -> impl Future<Output = EngineResult<()>> + Send;
}
