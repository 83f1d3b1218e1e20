#[allow(clippy::module_inception)]
mod orchestrator;
mod user_command;

pub use {orchestrator::Orchestrator, user_command::UserCommand};
