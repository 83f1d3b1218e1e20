mod macro_library;
mod playback_guard;
mod playback_source;
#[allow(clippy::module_inception)]
mod session;
mod session_phase;
mod session_state;
mod view;

pub(crate) use playback_guard::{PlaybackGuard, release_run};

pub use {
    macro_library::MacroLibrary,
    playback_source::PlaybackSource,
    session::Session,
    session_phase::SessionPhase,
    session_state::{SessionState, StateCell},
    view::View,
};
