//! [`Engine`] implementation backed by the local desktop.

use crate::{
    AppError, AppResult, ShellCommand, ShellProxy,
    engine::{Player, Recorder, Store},
};

use macro_deck_core::{
    AppSettings, AppSettingsPatch, Engine, EngineError, EngineResult, EngineSignal,
    HotkeySettings, Macro, MacroEvent, MacroId, RecordingSettings, WindowSize,
};

use tokio::sync::{mpsc, oneshot};
use tracing::{info, instrument};

/// Local engine: file store, `rdev` recorder, `enigo` player and the window
/// shell reached through the event loop proxy.
pub struct LocalEngine {
    store: Store,
    recorder: Recorder,
    player: Player,
    shell: ShellProxy,
}

impl LocalEngine {
    /// Assemble the engine. Recorder warnings are sent on `signal_tx`.
    pub fn new(store: Store, shell: ShellProxy, signal_tx: mpsc::Sender<EngineSignal>) -> Self {
        Self {
            store,
            recorder: Recorder::new(signal_tx),
            player: Player::new(),
            shell,
        }
    }

    /// Proxy to the main thread.
    pub fn shell(&self) -> &ShellProxy {
        &self.shell
    }

    /// Run a store operation on the blocking pool.
    async fn with_store<T, F>(&self, operation: &'static str, f: F) -> EngineResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Store) -> AppResult<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(store))
            .await
            .map_err(|e| EngineError::unavailable(format!("{} task failed: {}", operation, e)))?
            .map_err(failed(operation))
    }

    fn send(&self, operation: &'static str, command: ShellCommand) -> EngineResult<()> {
        self.shell.send(command).map_err(failed(operation))
    }
}

/// Convert a local failure into the engine error the session reports.
fn failed(operation: &'static str) -> impl Fn(AppError) -> EngineError {
    move |e| EngineError::request_failed(operation, e.to_string())
}

impl Engine for LocalEngine {
    #[instrument(skip(self))]
    async fn start_recording(&self, settings: RecordingSettings) -> EngineResult<()> {
        let stored = self
            .with_store("start_recording", |store| store.load_settings())
            .await?;
        self.recorder
            .start(settings, stored.hotkeys)
            .map_err(failed("start_recording"))
    }

    #[instrument(skip(self))]
    async fn stop_recording(&self) -> EngineResult<Vec<MacroEvent>> {
        self.recorder.stop().map_err(failed("stop_recording"))
    }

    async fn is_recording(&self) -> EngineResult<bool> {
        self.recorder.is_recording().map_err(failed("is_recording"))
    }

    #[instrument(skip(self, macro_data), fields(macro_id = %macro_data.id))]
    async fn play_macro(&self, macro_data: Macro) -> EngineResult<()> {
        self.player
            .play(macro_data)
            .await
            .map(|_| ())
            .map_err(failed("play_macro"))
    }

    async fn cancel_playback(&self) -> EngineResult<()> {
        self.player.cancel();
        Ok(())
    }

    async fn save_macro(&self, macro_data: Macro) -> EngineResult<()> {
        self.with_store("save_macro", move |store| store.save_macro(macro_data))
            .await
    }

    async fn delete_macro(&self, macro_id: MacroId) -> EngineResult<()> {
        self.with_store("delete_macro", move |store| store.delete_macro(&macro_id))
            .await
    }

    async fn import_macro(&self) -> EngineResult<Option<Macro>> {
        self.with_store("import_macro", |store| store.import_next())
            .await
    }

    async fn export_macro(&self, macro_data: Macro) -> EngineResult<()> {
        let path = self
            .with_store("export_macro", move |store| store.export_macro(&macro_data))
            .await?;
        info!(path = ?path, "Export written");
        Ok(())
    }

    async fn load_all_macros(&self) -> EngineResult<Vec<Macro>> {
        self.with_store("load_all_macros", |store| store.load_macros())
            .await
    }

    async fn get_hotkeys(&self) -> EngineResult<HotkeySettings> {
        let stored = self
            .with_store("get_hotkeys", |store| store.load_settings())
            .await?;
        Ok(stored.hotkeys)
    }

    #[instrument(skip(self))]
    async fn update_hotkeys(&self, hotkeys: HotkeySettings) -> EngineResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(
            "update_hotkeys",
            ShellCommand::RegisterHotkeys {
                hotkeys: hotkeys.clone(),
                reply: reply_tx,
            },
        )?;

        reply_rx
            .await
            .map_err(|_| EngineError::unavailable("Window shell dropped the registration"))?
            .map_err(failed("update_hotkeys"))?;

        self.with_store("update_hotkeys", move |store| store.save_hotkeys(hotkeys))
            .await
    }

    async fn get_app_settings(&self) -> EngineResult<AppSettings> {
        let stored = self
            .with_store("get_app_settings", |store| store.load_settings())
            .await?;
        Ok(stored.app)
    }

    #[instrument(skip(self))]
    async fn update_app_settings(&self, patch: AppSettingsPatch) -> EngineResult<()> {
        let always_on_top = patch.always_on_top;
        self.with_store("update_app_settings", move |store| {
            store.update_app_settings(&patch)
        })
        .await?;

        if let Some(always_on_top) = always_on_top {
            self.send(
                "update_app_settings",
                ShellCommand::SetAlwaysOnTop(always_on_top),
            )?;
        }

        Ok(())
    }

    async fn set_window_size(&self, size: WindowSize) -> EngineResult<()> {
        self.send("set_window_size", ShellCommand::SetWindowSize(size))
    }

    async fn minimize(&self) -> EngineResult<()> {
        self.send("minimize", ShellCommand::Minimize)
    }

    async fn maximize(&self) -> EngineResult<()> {
        self.send("maximize", ShellCommand::Maximize)
    }

    async fn close(&self) -> EngineResult<()> {
        self.send("close", ShellCommand::Close)
    }
}
