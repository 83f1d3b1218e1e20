//! On-disk macro library and engine settings.
//!
//! Layout under the data directory:
//!
//! ```text
//! macros.json        every saved macro
//! settings.toml      hotkey bindings and application settings
//! exports/<id>.json  one file per exported macro
//! imports/*.json     macros waiting to be imported
//! ```

use crate::{AppError, AppResult};

use macro_deck_core::{AppSettings, AppSettingsPatch, HotkeySettings, Macro, MacroId};

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const MACROS_FILE: &str = "macros.json";
const SETTINGS_FILE: &str = "settings.toml";
const EXPORTS_DIR: &str = "exports";
const IMPORTS_DIR: &str = "imports";
const IMPORTED_EXTENSION: &str = "imported";

/// Settings persisted alongside the library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    /// Global hotkey bindings.
    #[serde(default)]
    pub hotkeys: HotkeySettings,
    /// Window and selection preferences.
    #[serde(default)]
    pub app: AppSettings,
}

/// File-backed store. All methods are blocking.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open a store rooted at `root`, creating the directory if needed.
    #[track_caller]
    pub fn open(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = ?root, "Store opened");
        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory exported macros are written to.
    pub fn exports_dir(&self) -> PathBuf {
        self.root.join(EXPORTS_DIR)
    }

    /// Directory macros are imported from.
    pub fn imports_dir(&self) -> PathBuf {
        self.root.join(IMPORTS_DIR)
    }

    /// Every saved macro. A missing file is an empty library.
    #[track_caller]
    pub fn load_macros(&self) -> AppResult<Vec<Macro>> {
        let path = self.root.join(MACROS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)?;
        serde_json::from_str(&contents)
            .map_err(|e| AppError::storage(format!("Failed to parse {}: {}", MACROS_FILE, e)))
    }

    /// Insert or replace a macro by id.
    #[track_caller]
    #[instrument(skip(self, macro_data), fields(macro_id = %macro_data.id))]
    pub fn save_macro(&self, macro_data: Macro) -> AppResult<()> {
        let mut macros = self.load_macros()?;

        match macros.iter_mut().find(|m| m.id == macro_data.id) {
            Some(existing) => *existing = macro_data,
            None => macros.push(macro_data),
        }

        self.write_macros(&macros)
    }

    /// Remove a macro. Removing an unknown id is not an error.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete_macro(&self, macro_id: &MacroId) -> AppResult<()> {
        let mut macros = self.load_macros()?;
        let before = macros.len();
        macros.retain(|m| m.id != *macro_id);

        if macros.len() == before {
            warn!(%macro_id, "Delete requested for unknown macro");
            return Ok(());
        }

        self.write_macros(&macros)
    }

    /// Stored settings, or defaults when none were saved yet.
    #[track_caller]
    pub fn load_settings(&self) -> AppResult<StoredSettings> {
        let path = self.root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(StoredSettings::default());
        }

        let contents = fs::read_to_string(&path)?;
        toml::from_str(&contents)
            .map_err(|e| AppError::storage(format!("Failed to parse {}: {}", SETTINGS_FILE, e)))
    }

    /// Apply a partial update to the application settings.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_app_settings(&self, patch: &AppSettingsPatch) -> AppResult<AppSettings> {
        let mut settings = self.load_settings()?;
        patch.apply_to(&mut settings.app);
        self.write_settings(&settings)?;
        Ok(settings.app)
    }

    /// Replace the hotkey bindings.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_hotkeys(&self, hotkeys: HotkeySettings) -> AppResult<()> {
        let mut settings = self.load_settings()?;
        settings.hotkeys = hotkeys;
        self.write_settings(&settings)
    }

    /// Write a macro to `exports/<id>.json` and return the path.
    #[track_caller]
    #[instrument(skip(self, macro_data), fields(macro_id = %macro_data.id))]
    pub fn export_macro(&self, macro_data: &Macro) -> AppResult<PathBuf> {
        let dir = self.exports_dir();
        fs::create_dir_all(&dir)?;

        let contents = serde_json::to_string_pretty(macro_data)
            .map_err(|e| AppError::storage(format!("Failed to serialize macro: {}", e)))?;
        let path = dir.join(format!("{}.json", macro_data.id));
        write_atomic(&path, contents.as_bytes())?;

        info!(path = ?path, "Macro exported");

        Ok(path)
    }

    /// Take the first pending file in `imports/`.
    ///
    /// The imported macro gets a fresh id so it never overwrites an existing
    /// one, and the source file is renamed to `*.imported` so it is only
    /// picked up once. `None` when nothing is waiting.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn import_next(&self) -> AppResult<Option<Macro>> {
        let dir = self.imports_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            return Ok(None);
        }

        let mut pending: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        pending.sort();

        let Some(path) = pending.into_iter().next() else {
            return Ok(None);
        };

        let contents = fs::read_to_string(&path)?;
        let mut macro_data: Macro = serde_json::from_str(&contents).map_err(|e| {
            AppError::storage(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        macro_data.id = MacroId::generate();

        fs::rename(&path, path.with_extension(IMPORTED_EXTENSION))?;

        info!(path = ?path, macro_id = %macro_data.id, "Macro imported");

        Ok(Some(macro_data))
    }

    #[track_caller]
    fn write_macros(&self, macros: &[Macro]) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(macros)
            .map_err(|e| AppError::storage(format!("Failed to serialize macros: {}", e)))?;
        write_atomic(&self.root.join(MACROS_FILE), contents.as_bytes())?;
        debug!(count = macros.len(), "Macro library written");
        Ok(())
    }

    #[track_caller]
    fn write_settings(&self, settings: &StoredSettings) -> AppResult<()> {
        let contents = toml::to_string_pretty(settings)
            .map_err(|e| AppError::storage(format!("Failed to serialize settings: {}", e)))?;
        write_atomic(&self.root.join(SETTINGS_FILE), contents.as_bytes())
    }
}

/// Write through a temp file and rename so readers never see a partial file.
#[track_caller]
fn write_atomic(path: &Path, contents: &[u8]) -> AppResult<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut temp_file = fs::File::create(&temp_path)?;
    temp_file.write_all(contents)?;
    temp_file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
