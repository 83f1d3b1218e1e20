//! Line-oriented command surface on stdin.
//!
//! Each line is parsed against the current session state (so macros can be
//! referenced by their position in `list`) and turned into a
//! [`UserCommand`]. Toasts are printed as they arrive.

use crate::{AppError, AppResult};

use macro_deck_core::{
    HotkeySettings, Macro, MacroEdit, MacroId, NotificationRouter, PlaybackSettings, RepeatMode,
    SessionState, StateCell, Toast, UserCommand, View, estimate_duration_ms,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{broadcast, mpsc, watch},
};
use tracing::{debug, info, instrument, warn};

const HELP: &str = "\
Commands:
  record | stop                    start or stop recording
  play [n|id] | play-buffer        replay a macro, the selection or the buffer
  halt                             stop playback
  list | select <n|id>             show or select saved macros
  rename <n|id> <name>             rename a macro
  delete <n|id> | export <n|id>    remove or export a macro
  import                           import the next file from the imports folder
  speed <x> | repeat <once|n|inf>  playback settings
  capture <moves|clicks|keys> <on|off>
  bind <record-start|record-stop|playback-start|playback-stop> <accelerator>
  view <recorder|library|settings> | mini | expand
  top <on|off> | minimize | maximize | close
  help | quit";

/// What a console line asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    /// Forward to the orchestrator.
    Command(UserCommand),
    /// Print the macro library.
    List,
    /// Print usage.
    Help,
    /// Blank line.
    Nothing,
}

/// Parse one line of input.
pub fn parse_line(line: &str, state: &SessionState) -> Result<ConsoleInput, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ConsoleInput::Nothing);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("help" | "?", _) => return Ok(ConsoleInput::Help),
        ("list" | "ls", _) => return Ok(ConsoleInput::List),
        ("record", []) => UserCommand::StartRecording,
        ("stop", []) => UserCommand::StopRecording,
        ("play", []) => UserCommand::PlaySelected,
        ("play", [reference]) => UserCommand::PlayMacro(resolve(reference, state)?),
        ("play-buffer", []) => UserCommand::PlayBuffer,
        ("halt" | "stop-playback", []) => UserCommand::StopPlayback,
        ("select", [reference]) => UserCommand::SelectMacro(resolve(reference, state)?),
        ("delete", [reference]) => UserCommand::DeleteMacro(resolve(reference, state)?),
        ("export", [reference]) => UserCommand::ExportMacro(resolve(reference, state)?),
        ("import", []) => UserCommand::ImportMacro,
        ("rename", [reference, name @ ..]) if !name.is_empty() => UserCommand::EditMacro {
            macro_id: resolve(reference, state)?,
            edit: MacroEdit {
                name: Some(name.join(" ")),
                ..MacroEdit::default()
            },
        },
        ("speed", [speed]) => {
            let speed: f64 = speed
                .trim_end_matches('x')
                .parse()
                .map_err(|_| format!("invalid speed `{speed}`"))?;
            UserCommand::UpdatePlaybackSettings(PlaybackSettings {
                speed,
                ..state.playback_settings
            })
        }
        ("repeat", [mode]) => UserCommand::UpdatePlaybackSettings(PlaybackSettings {
            repeat: parse_repeat(mode)?,
            ..state.playback_settings
        }),
        ("capture", [source, toggle]) => {
            let enabled = parse_toggle(toggle)?;
            let mut settings = state.recording_settings;
            match *source {
                "moves" => settings.capture_mouse_move = enabled,
                "clicks" => settings.capture_mouse_clicks = enabled,
                "keys" => settings.capture_keyboard = enabled,
                other => return Err(format!("unknown capture source `{other}`")),
            }
            UserCommand::UpdateRecordingSettings(settings)
        }
        ("bind", [action, accelerator]) => {
            UserCommand::UpdateHotkeys(rebind(&state.hotkeys, action, accelerator)?)
        }
        ("view", [view]) => UserCommand::SetView(view.parse::<View>()?),
        ("mini", []) => UserCommand::ToggleMiniMode,
        ("expand", []) => UserCommand::ExpandWindow,
        ("top", [toggle]) => UserCommand::SetAlwaysOnTop(parse_toggle(toggle)?),
        ("minimize", []) => UserCommand::Minimize,
        ("maximize", []) => UserCommand::Maximize,
        ("close", []) => UserCommand::Close,
        ("quit" | "exit", []) => UserCommand::Shutdown,
        (other, _) => return Err(format!("unknown command `{other}`, try `help`")),
    };

    Ok(ConsoleInput::Command(command))
}

/// Render the library as numbered lines, marking the selection.
pub fn render_library(state: &SessionState) -> String {
    if state.library.is_empty() {
        return "No saved macros".to_string();
    }

    state
        .library
        .iter()
        .enumerate()
        .map(|(index, macro_data)| {
            let marker = if state.selected_macro_id.as_ref() == Some(&macro_data.id) {
                '*'
            } else {
                ' '
            };
            format!("{marker}{:>3}. {}", index + 1, summary(macro_data))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn summary(macro_data: &Macro) -> String {
    let duration_ms = estimate_duration_ms(&macro_data.events, &macro_data.playback_settings);
    format!(
        "{} ({} events, ~{:.1}s) [{}]",
        macro_data.name,
        macro_data.events.len(),
        duration_ms as f64 / 1000.0,
        macro_data.id
    )
}

/// A 1-based position in the library, or a full id.
fn resolve(reference: &str, state: &SessionState) -> Result<MacroId, String> {
    if let Ok(position) = reference.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| state.library.iter().nth(index))
            .map(|m| m.id.clone())
            .ok_or_else(|| format!("no macro at position {position}"));
    }
    Ok(MacroId::from(reference))
}

fn parse_repeat(mode: &str) -> Result<RepeatMode, String> {
    match mode {
        "once" => Ok(RepeatMode::Once),
        "inf" | "infinite" | "loop" => Ok(RepeatMode::Infinite),
        count => count
            .parse()
            .map(RepeatMode::Count)
            .map_err(|_| format!("invalid repeat `{count}`")),
    }
}

fn parse_toggle(toggle: &str) -> Result<bool, String> {
    match toggle {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on or off, got `{other}`")),
    }
}

fn rebind(current: &HotkeySettings, action: &str, accelerator: &str) -> Result<HotkeySettings, String> {
    let mut hotkeys = current.clone();
    let slot = match action {
        "record-start" => &mut hotkeys.record_start,
        "record-stop" => &mut hotkeys.record_stop,
        "playback-start" => &mut hotkeys.playback_start,
        "playback-stop" => &mut hotkeys.playback_stop,
        other => return Err(format!("unknown hotkey action `{other}`")),
    };
    *slot = accelerator.to_string();
    Ok(hotkeys)
}

/// Interactive console bound to the orchestrator's command channel.
pub struct Console {
    state: StateCell,
    command_tx: mpsc::Sender<UserCommand>,
    toasts: broadcast::Receiver<Toast>,
}

impl Console {
    /// Create a console that prints toasts from `notifier`.
    pub fn new(
        state: StateCell,
        notifier: &NotificationRouter,
        command_tx: mpsc::Sender<UserCommand>,
    ) -> Self {
        Self {
            state,
            command_tx,
            toasts: notifier.subscribe_toasts(),
        }
    }

    /// Read stdin until shutdown, `quit` or end of input.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("Macro Deck ready. Type `help` for commands.");

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console shutting down");
                    break;
                }
                toast = self.toasts.recv() => match toast {
                    Ok(toast) => println!("[{}] {}", toast.severity, toast.message),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Console fell behind on notifications");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                line = lines.next_line() => match line? {
                    Some(line) => {
                        if self.handle(&line).await? {
                            break;
                        }
                    }
                    None => {
                        debug!("Console input closed");
                        break;
                    }
                },
            }
        }

        Ok(())
    }

    /// Handle one line. Returns `true` after a shutdown request.
    async fn handle(&self, line: &str) -> AppResult<bool> {
        let parsed = self.state.read(|state| parse_line(line, state));

        match parsed {
            Ok(ConsoleInput::Nothing) => Ok(false),
            Ok(ConsoleInput::Help) => {
                println!("{HELP}");
                Ok(false)
            }
            Ok(ConsoleInput::List) => {
                println!("{}", self.state.read(render_library));
                Ok(false)
            }
            Ok(ConsoleInput::Command(command)) => {
                let shutdown = command == UserCommand::Shutdown;
                self.command_tx
                    .send(command)
                    .await
                    .map_err(|e| AppError::ChannelSendFailed {
                        message: format!("Failed to send command: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    })?;
                Ok(shutdown)
            }
            Err(reason) => {
                println!("{reason}");
                Ok(false)
            }
        }
    }
}
