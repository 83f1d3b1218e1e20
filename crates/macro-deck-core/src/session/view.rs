use std::{fmt, str::FromStr};

/// Screen currently shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// Recording controls and the working event buffer.
    #[default]
    Recorder,
    /// Saved macros.
    Library,
    /// Hotkey and application settings. Hotkeys are suspended here.
    Settings,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Recorder => "recorder",
            View::Library => "library",
            View::Settings => "settings",
        };
        f.write_str(name)
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recorder" | "record" => Ok(View::Recorder),
            "library" | "macros" => Ok(View::Library),
            "settings" => Ok(View::Settings),
            other => Err(format!("unknown view `{other}`")),
        }
    }
}
