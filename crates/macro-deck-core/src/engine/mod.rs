#[allow(clippy::module_inception)]
mod engine;
mod engine_signal;

pub use {engine::Engine, engine_signal::EngineSignal};
