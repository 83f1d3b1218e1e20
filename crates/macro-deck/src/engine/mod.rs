pub(crate) mod input_guard;
mod local_engine;
pub(crate) mod player;
pub(crate) mod recorder;
pub(crate) mod store;

pub(crate) use {
    local_engine::LocalEngine,
    player::Player,
    recorder::Recorder,
    store::Store,
};
