//! Macro Deck Core Library
//!
//! Session and window-mode orchestration for a desktop macro recorder. The
//! actual capture, simulation and storage happen in an external engine
//! reached through the [`Engine`] trait; this crate decides when to ask for
//! them and keeps one consistent view of recording, playback, window mode,
//! selection and notifications.
//!
//! # Example
//!
//! ```no_run
//! use macro_deck_core::{
//!     DEFAULT_BANNER_TIMEOUT, Engine, NotificationRouter, Orchestrator, StateCell, WindowPolicy,
//! };
//!
//! use std::sync::Arc;
//!
//! use tokio::sync::{mpsc, watch};
//!
//! async fn serve<E: Engine>(engine: E) -> macro_deck_core::CoreResult<()> {
//!     let state = StateCell::default();
//!     let notifier = NotificationRouter::new(state.clone(), DEFAULT_BANNER_TIMEOUT);
//!     let orchestrator =
//!         Orchestrator::new(Arc::new(engine), state, notifier, WindowPolicy::default());
//!
//!     orchestrator.session().initialize().await?;
//!
//!     let (_signal_tx, signal_rx) = mpsc::channel(32);
//!     let (_command_tx, command_rx) = mpsc::channel(32);
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!     orchestrator.run(signal_rx, command_rx, shutdown_rx).await
//! }
//! ```

mod duration;
mod engine;
mod error;
mod hotkey;
mod model;
mod notify;
mod orchestrator;
mod session;
mod window;

pub use {
    duration::estimate_duration_ms,
    engine::{Engine, EngineSignal},
    error::{EngineError, EngineResult, Result as CoreResult, SessionError},
    hotkey::{GatedAction, HotkeyGate, HotkeySignal, evaluate as evaluate_hotkey},
    model::{
        AppSettings, AppSettingsPatch, DEFAULT_REPEAT_INTERVAL_MS, HotkeySettings,
        MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED, Macro, MacroEdit, MacroEvent, MacroEventKind,
        MacroId, MouseButton, PlaybackSettings, RecordingSettings, RepeatMode,
    },
    notify::{Banner, DEFAULT_BANNER_TIMEOUT, NotificationRouter, Severity, Toast},
    orchestrator::{Orchestrator, UserCommand},
    session::{
        MacroLibrary, PlaybackSource, Session, SessionPhase, SessionState, StateCell, View,
    },
    window::{ResizeDebouncer, WindowMode, WindowModeController, WindowPolicy, WindowSize},
};

#[cfg(test)]
mod tests;
