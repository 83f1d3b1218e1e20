mod config;
mod input;
mod recorder;
mod support;
