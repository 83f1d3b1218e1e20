use crate::model::MacroId;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Failure reported by the external engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine received the request and rejected it or failed to complete it.
    #[error("Engine request `{operation}` failed: {reason} {location}")]
    RequestFailed {
        /// Name of the engine operation that failed.
        operation: &'static str,
        /// Human-readable reason reported by the engine.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The engine could not be reached at all.
    #[error("Engine unavailable: {reason} {location}")]
    Unavailable {
        /// Human-readable reason for failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl EngineError {
    /// Build a [`EngineError::RequestFailed`] at the caller's location.
    #[track_caller]
    pub fn request_failed(operation: &'static str, reason: impl Into<String>) -> Self {
        EngineError::RequestFailed {
            operation,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Build a [`EngineError::Unavailable`] at the caller's location.
    #[track_caller]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        EngineError::Unavailable {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short reason suitable for showing to the user.
    pub fn reason(&self) -> &str {
        match self {
            EngineError::RequestFailed { reason, .. } | EngineError::Unavailable { reason, .. } => {
                reason
            }
        }
    }
}

/// Session orchestration errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A request to the external engine failed.
    #[error("Engine error: {source} {location}")]
    Engine {
        /// The underlying engine error.
        #[source]
        source: EngineError,
        /// Whether the failure was already logged and shown to the user.
        reported: bool,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Playback was requested with zero events.
    #[error("Nothing to play: event sequence is empty {location}")]
    EmptyInput {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The persisted selection references a macro that no longer exists.
    #[error("Selected macro {macro_id} is no longer in the library {location}")]
    SelectionStale {
        /// The stale macro id.
        macro_id: MacroId,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A command referenced a macro that is not in the library.
    #[error("Macro {macro_id} not found {location}")]
    MacroNotFound {
        /// The unknown macro id.
        macro_id: MacroId,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recording or playback settings failed validation.
    #[error("Invalid settings: {reason} {location}")]
    InvalidSettings {
        /// Description of the violated constraint.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The operation is only allowed while the session is idle.
    #[error("Cannot {operation} while recording or playing {location}")]
    Busy {
        /// The rejected operation.
        operation: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl SessionError {
    /// Whether the failure was already logged and shown to the user where it
    /// happened.
    pub fn is_reported(&self) -> bool {
        matches!(self, SessionError::Engine { reported: true, .. })
    }

    /// Wrap an engine failure that has already been surfaced.
    #[track_caller]
    pub(crate) fn reported_engine(source: EngineError) -> Self {
        SessionError::Engine {
            source,
            reported: true,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short description suitable for showing to the user.
    pub fn summary(&self) -> String {
        match self {
            SessionError::Engine { source, .. } => source.reason().to_string(),
            SessionError::EmptyInput { .. } => "Nothing to play".to_string(),
            SessionError::SelectionStale { .. } => "Selected macro no longer exists".to_string(),
            SessionError::MacroNotFound { macro_id, .. } => format!("Macro {macro_id} not found"),
            SessionError::InvalidSettings { reason, .. } => format!("Invalid settings: {reason}"),
            SessionError::Busy { operation, .. } => {
                format!("Cannot {operation} while recording or playing")
            }
        }
    }
}

// Manual From<EngineError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<EngineError> for SessionError {
    #[track_caller]
    fn from(source: EngineError) -> Self {
        SessionError::Engine {
            source,
            reported: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = StdResult<T, SessionError>;

/// Result type alias for engine requests.
pub type EngineResult<T> = StdResult<T, EngineError>;
