// Event script: one host event per line, used to drive a session headless.
//
//   resize <w> | down <x> [touch] | move <x> [touch] | up [touch]
//   cancel <capture|hidden|focus|escape|idle> | hide | show
//   display <editor|style|preview> | expand <follow|0|1|2> | header
//   type <text> | wait <ms> | frame
//
// Blank lines and lines starting with `#` are skipped.

use std::time::Duration;

use folio_core::{CancelReason, InputEvent, Key, Modifiers, PaneRole, PointerSource, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(InputEvent),
    Cancel(CancelReason),
    Type(String),
    Wait(Duration),
    Frame,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let command = match name {
        "resize" => Command::Event(InputEvent::Resize {
            width: number(args.next(), "resize", "a width")?,
        }),
        "down" | "move" => {
            let command = if name == "down" { "down" } else { "move" };
            let x = number(args.next(), command, "an x coordinate")?;
            let position = Vec2::new(x, 0.0);
            let source = source(args.next(), command)?;
            Command::Event(if name == "down" {
                InputEvent::PointerDown { position, source }
            } else {
                InputEvent::PointerMove { position, source }
            })
        }
        "up" => Command::Event(InputEvent::PointerUp {
            source: source(args.next(), "up")?,
        }),
        "cancel" => Command::Cancel(
            args.next()
                .and_then(CancelReason::from_name)
                .ok_or(ScriptError::BadArgument {
                    command: "cancel",
                    expected: "capture, hidden, focus, escape or idle",
                })?,
        ),
        "hide" => Command::Event(InputEvent::VisibilityChanged { visible: false }),
        "show" => Command::Event(InputEvent::VisibilityChanged { visible: true }),
        "display" => {
            let role = args
                .next()
                .and_then(PaneRole::from_name)
                .ok_or(ScriptError::BadArgument {
                    command: "display",
                    expected: "editor, style or preview",
                })?;
            let digit = char::from(b'1' + role.index());
            Command::Event(hotkey(digit, false))
        }
        "expand" => {
            let digit = match args.next() {
                Some("follow") => '0',
                Some("0") => '1',
                Some("1") => '2',
                Some("2") => '3',
                _ => {
                    return Err(ScriptError::BadArgument {
                        command: "expand",
                        expected: "follow, 0, 1 or 2",
                    })
                }
            };
            Command::Event(hotkey(digit, true))
        }
        "header" => Command::Event(hotkey('h', true)),
        "type" => Command::Type(rest.replace("\\n", "\n")),
        "wait" => {
            let ms = args
                .next()
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or(ScriptError::BadArgument {
                    command: "wait",
                    expected: "milliseconds",
                })?;
            Command::Wait(Duration::from_millis(ms))
        }
        "frame" => Command::Frame,
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn number(
    arg: Option<&str>,
    command: &'static str,
    expected: &'static str,
) -> Result<f32, ScriptError> {
    arg.and_then(|s| s.parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .ok_or(ScriptError::BadArgument { command, expected })
}

fn source(arg: Option<&str>, command: &'static str) -> Result<PointerSource, ScriptError> {
    match arg {
        None | Some("mouse") => Ok(PointerSource::Mouse),
        Some("touch") => Ok(PointerSource::Touch),
        Some(_) => Err(ScriptError::BadArgument {
            command,
            expected: "mouse or touch",
        }),
    }
}

/// Toolbar operations are issued through their keyboard shortcuts.
fn hotkey(c: char, shift: bool) -> InputEvent {
    InputEvent::KeyPress {
        key: Key::Char(c),
        modifiers: Modifiers {
            meta: true,
            shift,
            ..Default::default()
        },
    }
}
