use std::fmt;

/// Engine-originated hotkey press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeySignal {
    /// `hotkey:record-start`
    RecordStart,
    /// `hotkey:record-stop`
    RecordStop,
    /// `hotkey:playback-start`
    PlaybackStart,
    /// `hotkey:playback-stop`
    PlaybackStop,
}

impl HotkeySignal {
    /// All signals, in binding order.
    pub const ALL: [HotkeySignal; 4] = [
        HotkeySignal::RecordStart,
        HotkeySignal::RecordStop,
        HotkeySignal::PlaybackStart,
        HotkeySignal::PlaybackStop,
    ];
}

impl fmt::Display for HotkeySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HotkeySignal::RecordStart => "hotkey:record-start",
            HotkeySignal::RecordStop => "hotkey:record-stop",
            HotkeySignal::PlaybackStart => "hotkey:playback-start",
            HotkeySignal::PlaybackStop => "hotkey:playback-stop",
        };
        f.write_str(name)
    }
}
