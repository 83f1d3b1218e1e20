use std::fmt;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// An operation completed.
    Success,
    /// An operation failed.
    Error,
    /// Something needs attention but nothing failed.
    Warning,
    /// Neutral status.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(name)
    }
}

/// Transient toast shown in the normal layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Text to show.
    pub message: String,
    /// Styling key.
    pub severity: Severity,
}

/// Single-line status shown in the compact layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Monotonic id; the auto-clear timer only clears its own banner.
    pub id: u64,
    /// Text to show.
    pub message: String,
}
