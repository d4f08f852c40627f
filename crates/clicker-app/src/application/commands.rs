//! The text command surface used by the headless binary.
//!
//! Each line typed on stdin parses into one [`SessionCommand`], which
//! [`ClickerSession::execute`](crate::application::session::ClickerSession::execute)
//! maps onto exactly one session operation.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Which humanization switch a `humanize` command changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanizeTarget {
    Both,
    Delay,
    ClickSpot,
}

/// Repeat setting carried by the `repeat` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatSetting {
    Count(u32),
    Continuous,
}

/// One user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    StartRecording,
    CancelRecording,
    TogglePlayPause,
    Stop,
    Clear,
    DeleteSelected,
    /// `None` clears the trigger.
    SetHotkey(Option<u32>),
    Load(PathBuf),
    Save(PathBuf),
    Status,
    List,
    ToggleEnabled,
    ToggleSelected,
    /// Flips the selection of the click at a zero-based index.
    Select(usize),
    Enable(usize),
    Disable(usize),
    MoveClick { index: usize, x: i32, y: i32 },
    SetDelay(u64),
    SetRepeat(RepeatSetting),
    SetHumanize(HumanizeTarget, bool),
    Help,
    Quit,
}

/// Error type for command parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("`{command}`: invalid value `{value}`")]
    InvalidArgument { command: &'static str, value: String },
}

/// Help text listing every command.
pub const HELP: &str = "\
commands:
  record                      arm the recorder; the next left click is stored
  cancel                      cancel recording
  toggle                      play / pause / resume
  stop                        stop playback (or cancel recording)
  clear                       remove every click
  delete                      remove the selected clicks
  hotkey <code|none>          set the play/pause key (virtual-key code, e.g. 0x78)
  load <path> | save <path>   read or write a click document
  status | list               show the status line or the click list
  toggle-enabled              flip enabled on the selection, or on all clicks
  toggle-selected             select or deselect all clicks
  select|enable|disable <i>   edit the click at index i
  move <i> <x> <y>            change the position of click i
  delay <ms>                  set the delay between clicks
  repeat <n|continuous>       set the repeat policy
  humanize [delay|spot] <on|off>
  quit";

impl FromStr for SessionCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandParseError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "record" => SessionCommand::StartRecording,
            "cancel" => SessionCommand::CancelRecording,
            "toggle" => SessionCommand::TogglePlayPause,
            "stop" => SessionCommand::Stop,
            "clear" => SessionCommand::Clear,
            "delete" => SessionCommand::DeleteSelected,
            "status" => SessionCommand::Status,
            "list" => SessionCommand::List,
            "toggle-enabled" => SessionCommand::ToggleEnabled,
            "toggle-selected" => SessionCommand::ToggleSelected,
            "help" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            "hotkey" => {
                let value = required(&args, 0, "hotkey", "a key code or `none`")?;
                if value.eq_ignore_ascii_case("none") {
                    SessionCommand::SetHotkey(None)
                } else {
                    SessionCommand::SetHotkey(Some(parse_key_code(value)?))
                }
            }
            "load" => SessionCommand::Load(path_argument(line, name, "load")?),
            "save" => SessionCommand::Save(path_argument(line, name, "save")?),
            "select" => SessionCommand::Select(index_argument(&args, "select")?),
            "enable" => SessionCommand::Enable(index_argument(&args, "enable")?),
            "disable" => SessionCommand::Disable(index_argument(&args, "disable")?),
            "move" => SessionCommand::MoveClick {
                index: index_argument(&args, "move")?,
                x: parse_number(required(&args, 1, "move", "an x coordinate")?, "move")?,
                y: parse_number(required(&args, 2, "move", "a y coordinate")?, "move")?,
            },
            "delay" => {
                let value = required(&args, 0, "delay", "milliseconds")?;
                SessionCommand::SetDelay(parse_number(value, "delay")?)
            }
            "repeat" => {
                let value = required(&args, 0, "repeat", "a count or `continuous`")?;
                if value.eq_ignore_ascii_case("continuous") {
                    SessionCommand::SetRepeat(RepeatSetting::Continuous)
                } else {
                    SessionCommand::SetRepeat(RepeatSetting::Count(parse_number(value, "repeat")?))
                }
            }
            "humanize" => parse_humanize(&args)?,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn required<'a>(
    args: &[&'a str],
    position: usize,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandParseError> {
    args.get(position)
        .copied()
        .ok_or(CommandParseError::MissingArgument { command, argument })
}

fn parse_number<T: FromStr>(value: &str, command: &'static str) -> Result<T, CommandParseError> {
    value.parse().map_err(|_| CommandParseError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

fn index_argument(args: &[&str], command: &'static str) -> Result<usize, CommandParseError> {
    parse_number(required(args, 0, command, "a click index")?, command)
}

/// Accepts decimal (`120`) or hex (`0x78`) virtual-key codes.
fn parse_key_code(value: &str) -> Result<u32, CommandParseError> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    };
    parsed.ok_or_else(|| CommandParseError::InvalidArgument {
        command: "hotkey",
        value: value.to_string(),
    })
}

/// Everything after the command word, so paths may contain spaces.
fn path_argument(
    line: &str,
    name: &str,
    command: &'static str,
) -> Result<PathBuf, CommandParseError> {
    let rest = line.trim_start()[name.len()..].trim();
    if rest.is_empty() {
        return Err(CommandParseError::MissingArgument {
            command,
            argument: "a file path",
        });
    }
    Ok(PathBuf::from(rest))
}

fn parse_humanize(args: &[&str]) -> Result<SessionCommand, CommandParseError> {
    let (target, switch) = match args {
        [switch] => (HumanizeTarget::Both, *switch),
        [target, switch] => {
            let target = match target.to_ascii_lowercase().as_str() {
                "delay" => HumanizeTarget::Delay,
                "spot" => HumanizeTarget::ClickSpot,
                _ => {
                    return Err(CommandParseError::InvalidArgument {
                        command: "humanize",
                        value: target.to_string(),
                    })
                }
            };
            (target, *switch)
        }
        _ => {
            return Err(CommandParseError::MissingArgument {
                command: "humanize",
                argument: "`on` or `off`",
            })
        }
    };
    let on = match switch.to_ascii_lowercase().as_str() {
        "on" => true,
        "off" => false,
        _ => {
            return Err(CommandParseError::InvalidArgument {
                command: "humanize",
                value: switch.to_string(),
            })
        }
    };
    Ok(SessionCommand::SetHumanize(target, on))
}
