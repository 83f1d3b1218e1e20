use crate::model::MacroId;

use serde::{Deserialize, Serialize};

/// Application settings held by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Keep the window above all others.
    #[serde(default)]
    pub always_on_top: bool,
    /// Macro selected when the application last ran.
    #[serde(default)]
    pub last_selected_macro_id: Option<MacroId>,
}

/// Partial update of [`AppSettings`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettingsPatch {
    /// New always-on-top flag.
    pub always_on_top: Option<bool>,
    /// New selection; `Some(None)` clears it.
    pub last_selected_macro_id: Option<Option<MacroId>>,
}

impl AppSettingsPatch {
    /// Patch that only changes the always-on-top flag.
    pub fn always_on_top(value: bool) -> Self {
        Self {
            always_on_top: Some(value),
            ..Self::default()
        }
    }

    /// Patch that only changes the persisted selection.
    pub fn selection(macro_id: Option<MacroId>) -> Self {
        Self {
            last_selected_macro_id: Some(macro_id),
            ..Self::default()
        }
    }

    /// Apply this patch to `settings`.
    pub fn apply_to(&self, settings: &mut AppSettings) {
        if let Some(always_on_top) = self.always_on_top {
            settings.always_on_top = always_on_top;
        }
        if let Some(selection) = &self.last_selected_macro_id {
            settings.last_selected_macro_id = selection.clone();
        }
    }
}
