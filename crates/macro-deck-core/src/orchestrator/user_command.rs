use crate::{
    model::{HotkeySettings, MacroEdit, MacroId, PlaybackSettings, RecordingSettings},
    session::View,
};

/// Commands issued by the user interface.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Start a recording.
    StartRecording,
    /// Stop the current recording.
    StopRecording,
    /// Replay a saved macro.
    PlayMacro(MacroId),
    /// Replay the selected macro, or the working buffer if nothing is selected.
    PlaySelected,
    /// Replay the working buffer.
    PlayBuffer,
    /// Stop the current playback.
    StopPlayback,
    /// Change the selection.
    SelectMacro(MacroId),
    /// Delete a macro.
    DeleteMacro(MacroId),
    /// Import a macro through the engine.
    ImportMacro,
    /// Export a macro through the engine.
    ExportMacro(MacroId),
    /// Edit a macro's metadata.
    EditMacro {
        /// Macro to edit.
        macro_id: MacroId,
        /// Changes to apply.
        edit: MacroEdit,
    },
    /// Switch the active view.
    SetView(View),
    /// Switch between normal and mini layouts.
    ToggleMiniMode,
    /// Leave the mini layout.
    ExpandWindow,
    /// Minimize the window.
    Minimize,
    /// Maximize the window.
    Maximize,
    /// Close the window.
    Close,
    /// Replace the capture filters.
    UpdateRecordingSettings(RecordingSettings),
    /// Replace the working playback settings.
    UpdatePlaybackSettings(PlaybackSettings),
    /// Rebind hotkeys.
    UpdateHotkeys(HotkeySettings),
    /// Persist the always-on-top preference.
    SetAlwaysOnTop(bool),
    /// Stop the orchestrator.
    Shutdown,
}
